//! Bucket classification of aggregate values into ordered display classes.
//!
//! Buckets are upper-bound inclusive and lower-bound exclusive. Values above the last
//! bound fall into the last (overflow) bucket. Values below the first bound fall into
//! the first bucket, unless the table declares a floor class. Absent values have their
//! own no-data color, distinct from every measured class.

mod color;
mod tables;

use serde::{Deserialize, Serialize};

use crate::error::BucketError;

pub use color::Rgb;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub upper: f64,
    pub color: Rgb,
    #[serde(default)]
    pub label: String,
}

/// Class for values strictly below `below`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub below: f64,
    pub color: Rgb,
    #[serde(default)]
    pub label: String,
}

/// Which class a value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    NoData,
    Floor,
    Bucket(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
}

#[derive(Deserialize)]
struct RawBucketTable {
    version: String,
    #[serde(default)]
    floor: Option<Floor>,
    buckets: Vec<Bucket>,
    no_data: Rgb,
}

/// A fixed, versioned classification table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBucketTable")]
pub struct BucketTable {
    version: String,
    floor: Option<Floor>,
    buckets: Vec<Bucket>,
    no_data: Rgb,
}

impl TryFrom<RawBucketTable> for BucketTable {
    type Error = BucketError;
    fn try_from(raw: RawBucketTable) -> Result<Self, Self::Error> {
        BucketTable::new(raw.version, raw.floor, raw.buckets, raw.no_data)
    }
}

impl BucketTable {
    /// Validates and builds a table. Bounds must be finite and strictly ascending,
    /// the floor bound must not exceed the first upper bound, and the no-data color
    /// must not be used by any measured class.
    pub fn new(version: impl Into<String>, floor: Option<Floor>, buckets: Vec<Bucket>, no_data: Rgb) -> Result<Self, BucketError> {
        let version = version.into();
        if buckets.is_empty() { return Err(BucketError::Empty(version)) }

        let bounds = floor.iter().map(|f| f.below).chain(buckets.iter().map(|b| b.upper));
        for bound in bounds {
            if !bound.is_finite() { return Err(BucketError::NonFinite { table: version, bound }) }
        }
        if let Some(floor) = &floor {
            if floor.below > buckets[0].upper {
                return Err(BucketError::NotAscending { table: version, previous: floor.below, bound: buckets[0].upper });
            }
        }
        for pair in buckets.windows(2) {
            if pair[1].upper <= pair[0].upper {
                return Err(BucketError::NotAscending { table: version, previous: pair[0].upper, bound: pair[1].upper });
            }
        }

        let measured = floor.iter().map(|f| f.color).chain(buckets.iter().map(|b| b.color));
        for color in measured {
            if color == no_data {
                return Err(BucketError::NoDataCollision { table: version, color: color.to_string() });
            }
        }

        Ok(Self { version, floor, buckets, no_data })
    }

    #[inline] pub fn version(&self) -> &str { &self.version }
    #[inline] pub fn buckets(&self) -> &[Bucket] { &self.buckets }
    #[inline] pub fn floor(&self) -> Option<&Floor> { self.floor.as_ref() }
    #[inline] pub fn no_data_color(&self) -> Rgb { self.no_data }

    pub fn classify(&self, value: Option<f64>) -> Class {
        let Some(value) = value.filter(|v| v.is_finite()) else { return Class::NoData };

        if let Some(floor) = &self.floor {
            if value < floor.below { return Class::Floor }
        }

        let idx = self.buckets.iter()
            .position(|bucket| value <= bucket.upper)
            .unwrap_or(self.buckets.len() - 1);
        Class::Bucket(idx)
    }

    pub fn color_of(&self, class: Class) -> Rgb {
        match class {
            Class::NoData => self.no_data,
            Class::Floor => self.floor.as_ref().map_or(self.no_data, |f| f.color),
            Class::Bucket(i) => self.buckets.get(i).map_or(self.no_data, |b| b.color),
        }
    }

    /// Color for `value`; `None` renders as no data.
    pub fn color(&self, value: Option<f64>) -> Rgb {
        self.color_of(self.classify(value))
    }

    /// Legend entries in ascending order, ending with the no-data entry. Buckets
    /// without a label get one derived from their bounds.
    pub fn legend(&self) -> Vec<LegendEntry> {
        let mut entries = Vec::with_capacity(self.buckets.len() + 2);

        if let Some(floor) = &self.floor {
            let label = if floor.label.is_empty() { format!("< {}", floor.below) } else { floor.label.clone() };
            entries.push(LegendEntry { label, color: floor.color });
        }

        let last = self.buckets.len() - 1;
        for (i, bucket) in self.buckets.iter().enumerate() {
            let label = if !bucket.label.is_empty() {
                bucket.label.clone()
            } else if i == 0 {
                match &self.floor {
                    Some(floor) => format!("{} - {}", floor.below, bucket.upper),
                    None => format!("≤ {}", bucket.upper),
                }
            } else if i == last {
                format!("> {}", self.buckets[i - 1].upper)
            } else {
                format!("> {} - {}", self.buckets[i - 1].upper, bucket.upper)
            };
            entries.push(LegendEntry { label, color: bucket.color });
        }

        entries.push(LegendEntry { label: "No data".into(), color: self.no_data });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAY: Rgb = Rgb::new(150, 150, 150);

    fn bucket(upper: f64, color: Rgb) -> Bucket {
        Bucket { upper, color, label: String::new() }
    }

    fn two_buckets() -> BucketTable {
        BucketTable::new("test", None, vec![
            bucket(131.0, Rgb::new(255, 255, 224)),
            bucket(165.0, Rgb::new(255, 215, 0)),
        ], GRAY).unwrap()
    }

    #[test]
    fn upper_bound_is_inclusive() {
        let table = two_buckets();
        assert_eq!(table.classify(Some(131.0)), Class::Bucket(0));
        assert_eq!(table.classify(Some(131.0001)), Class::Bucket(1));
        assert_eq!(table.classify(Some(165.0)), Class::Bucket(1));
    }

    #[test]
    fn below_first_and_above_last() {
        let table = two_buckets();
        assert_eq!(table.classify(Some(0.0)), Class::Bucket(0));
        assert_eq!(table.classify(Some(1e9)), Class::Bucket(1));
    }

    #[test]
    fn floor_class_takes_values_strictly_below() {
        let floor = Floor { below: 74.0, color: Rgb::new(255, 255, 240), label: String::new() };
        let table = BucketTable::new("test", Some(floor), vec![bucket(131.0, Rgb::new(255, 255, 224))], GRAY).unwrap();

        assert_eq!(table.classify(Some(73.9)), Class::Floor);
        assert_eq!(table.classify(Some(74.0)), Class::Bucket(0));
        assert_eq!(table.color(Some(10.0)), Rgb::new(255, 255, 240));
    }

    #[test]
    fn absent_and_non_finite_are_no_data() {
        let table = two_buckets();
        assert_eq!(table.classify(None), Class::NoData);
        assert_eq!(table.classify(Some(f64::NAN)), Class::NoData);
        assert_eq!(table.color(None), GRAY);
        assert_ne!(table.color(Some(0.0)), GRAY);
    }

    #[test]
    fn invalid_tables_are_rejected() {
        let red = Rgb::new(255, 0, 0);
        assert!(matches!(BucketTable::new("t", None, vec![], GRAY), Err(BucketError::Empty(_))));
        assert!(matches!(
            BucketTable::new("t", None, vec![bucket(10.0, red), bucket(10.0, Rgb::new(0, 0, 255))], GRAY),
            Err(BucketError::NotAscending { .. })
        ));
        assert!(matches!(
            BucketTable::new("t", None, vec![bucket(f64::INFINITY, red)], GRAY),
            Err(BucketError::NonFinite { .. })
        ));
        assert!(matches!(
            BucketTable::new("t", None, vec![bucket(10.0, GRAY)], GRAY),
            Err(BucketError::NoDataCollision { .. })
        ));
        let high_floor = Floor { below: 20.0, color: red, label: String::new() };
        assert!(matches!(
            BucketTable::new("t", Some(high_floor), vec![bucket(10.0, Rgb::new(0, 0, 255))], GRAY),
            Err(BucketError::NotAscending { .. })
        ));
    }

    #[test]
    fn derived_legend_labels() {
        let legend = two_buckets().legend();
        let labels: Vec<_> = legend.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["≤ 131", "> 131", "No data"]);
    }

    #[test]
    fn json_tables_are_validated() {
        let ok = r##"{"version":"v1","buckets":[{"upper":2,"color":"#2019f5"},{"upper":5,"color":"#601df0"}],"no_data":"#969696"}"##;
        let table: BucketTable = serde_json::from_str(ok).unwrap();
        assert_eq!(table.classify(Some(2.0)), Class::Bucket(0));

        let descending = r##"{"version":"v1","buckets":[{"upper":5,"color":"#2019f5"},{"upper":2,"color":"#601df0"}],"no_data":"#969696"}"##;
        assert!(serde_json::from_str::<BucketTable>(descending).is_err());
    }
}
