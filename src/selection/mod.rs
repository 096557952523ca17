//! Click selection: at most one selected unit at a time.

use crate::{key::{GeoLevel, RegionKey}, types::MeasurementRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(RegionKey),
}

/// What a click or reset did to the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Selected(RegionKey),
    Switched { from: RegionKey, to: RegionKey },
    Cleared(RegionKey),
    Unchanged,
}

impl SelectionChange {
    /// True when the selected unit differs from before.
    pub fn is_change(&self) -> bool { !matches!(self, SelectionChange::Unchanged) }
}

impl SelectionState {
    pub fn selected(&self) -> Option<&RegionKey> {
        match self {
            SelectionState::Unselected => None,
            SelectionState::Selected(key) => Some(key),
        }
    }

    /// Clicking the selected unit clears the selection; clicking any other unit
    /// selects it directly.
    pub fn click(&mut self, key: RegionKey) -> SelectionChange {
        let previous = std::mem::take(self);
        match previous {
            SelectionState::Unselected => {
                *self = SelectionState::Selected(key.clone());
                SelectionChange::Selected(key)
            }
            SelectionState::Selected(current) if current == key => SelectionChange::Cleared(current),
            SelectionState::Selected(current) => {
                *self = SelectionState::Selected(key.clone());
                SelectionChange::Switched { from: current, to: key }
            }
        }
    }

    pub fn reset(&mut self) -> SelectionChange {
        match std::mem::take(self) {
            SelectionState::Unselected => SelectionChange::Unchanged,
            SelectionState::Selected(current) => SelectionChange::Cleared(current),
        }
    }

    /// Predicate matching records in the same parent region as the selected unit.
    pub fn sibling_filter(&self) -> Option<SiblingFilter> {
        self.selected().map(|key| SiblingFilter::new(key, GeoLevel::State))
    }
}

/// Matches records whose parent region at `level` equals that of a reference unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingFilter {
    level: GeoLevel,
    parent: Option<RegionKey>,
}

impl SiblingFilter {
    pub fn new(key: &RegionKey, level: GeoLevel) -> Self {
        Self { level, parent: key.to_parent(level) }
    }

    pub fn parent(&self) -> Option<&RegionKey> { self.parent.as_ref() }

    pub fn matches(&self, record: &MeasurementRecord) -> bool {
        match &self.parent {
            Some(parent) => record.key.to_parent(self.level).as_ref() == Some(parent),
            None => false,
        }
    }
}
