//! Ranked list projection for the bar chart.

use serde::{Deserialize, Serialize};

use crate::classify::Rgb;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Input order.
    #[default]
    Natural,
    /// Highest value first; ties keep input order.
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Natural => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Natural,
        }
    }
}

/// One bar: `(display_name, value, color)`, plus the CSS the chart draws it with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub display_name: String,
    pub value: f64,
    pub color: Rgb,
    /// Translucent bar fill.
    pub fill: String,
    /// Opaque bar outline.
    pub border: String,
}

const BAR_ALPHA: f64 = 0.6;

impl RankedEntry {
    pub fn new(display_name: impl Into<String>, value: f64, color: Rgb) -> Self {
        Self {
            display_name: display_name.into(),
            value,
            color,
            fill: color.to_css_alpha(BAR_ALPHA),
            border: color.to_css(),
        }
    }
}

/// Entries in natural order plus the descending permutation over them. The natural
/// order is never rearranged, so switching back restores it exactly.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    natural: Vec<RankedEntry>,
    descending: Vec<usize>,
    order: SortOrder,
}

impl Ranking {
    pub fn new(entries: Vec<RankedEntry>, order: SortOrder) -> Self {
        let mut descending: Vec<usize> = (0..entries.len()).collect();
        // stable
        descending.sort_by(|&a, &b| entries[b].value.total_cmp(&entries[a].value));
        Self { natural: entries, descending, order }
    }

    #[inline] pub fn order(&self) -> SortOrder { self.order }
    #[inline] pub fn len(&self) -> usize { self.natural.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.natural.is_empty() }

    pub fn set_order(&mut self, order: SortOrder) { self.order = order }

    pub fn toggle(&mut self) -> SortOrder {
        self.order = self.order.toggled();
        self.order
    }

    /// Entries in the current order.
    pub fn entries(&self) -> Vec<&RankedEntry> {
        match self.order {
            SortOrder::Natural => self.natural.iter().collect(),
            SortOrder::Descending => self.descending.iter().map(|&i| &self.natural[i]).collect(),
        }
    }
}
