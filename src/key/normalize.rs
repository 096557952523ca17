use crate::{error::KeyError, map::FeatureLayer, parse::{RawKey, RawRecord}, types::MeasurementRecord};

use super::RegionKey;

/// A row whose key could not be normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub row: usize,
    pub error: KeyError,
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<MeasurementRecord>,
    /// Rows with ambiguous keys. Never joined.
    pub rejected: Vec<Rejection>,
    /// Rows keyed by a state name that matches no state feature (row, name).
    pub unmatched_names: Vec<(usize, String)>,
}

impl Normalized {
    pub fn first_rejection(&self) -> Option<&Rejection> { self.rejected.first() }
}

/// Derives the region key of every parsed row. Name-keyed rows are resolved
/// against `states` by exact display name.
pub fn normalize_rows(rows: &[RawRecord], states: &FeatureLayer) -> Normalized {
    let mut out = Normalized::default();

    for raw in rows {
        let key = match &raw.key {
            RawKey::Fips { state, county } => RegionKey::county(state, county),
            RawKey::Geoid(geoid) => RegionKey::from_geoid(geoid),
            RawKey::Name => match states.key_by_name(&raw.name) {
                Some(key) => Ok(key.clone()),
                None => {
                    log::debug!("[key] row {}: no state named {:?}", raw.row, raw.name);
                    out.unmatched_names.push((raw.row, raw.name.clone()));
                    continue;
                }
            },
        };

        match key {
            Ok(key) => out.records.push(MeasurementRecord::new(raw.name.clone(), key, raw.value)),
            Err(error) => {
                log::error!("[key] row {} rejected: {error}", raw.row);
                out.rejected.push(Rejection { row: raw.row, error });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(row: usize, name: &str, key: RawKey, value: f64) -> RawRecord {
        RawRecord { row, name: name.into(), key, value }
    }

    #[test]
    fn both_code_styles_give_the_same_key() {
        let rows = [
            raw(1, "Los Angeles", RawKey::Fips { state: "06".into(), county: "037".into() }, 150.0),
            raw(2, "Los Angeles", RawKey::Geoid("06037".into()), 170.0),
        ];
        let out = normalize_rows(&rows, &FeatureLayer::from_state_names());

        assert!(out.rejected.is_empty());
        assert_eq!(out.records[0].key, out.records[1].key);
    }

    #[test]
    fn unpadded_codes_are_rejected_not_joined() {
        let rows = [
            raw(1, "Los Angeles", RawKey::Fips { state: "6".into(), county: "037".into() }, 150.0),
            raw(2, "Autauga", RawKey::Geoid("1001".into()), 150.0),
            raw(3, "San Diego", RawKey::Geoid("06073".into()), 80.0),
        ];
        let out = normalize_rows(&rows, &FeatureLayer::from_state_names());

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.rejected.iter().map(|r| r.row).collect::<Vec<_>>(), vec![1, 2]);
        assert!(matches!(out.first_rejection().unwrap().error, KeyError::AmbiguousKey { .. }));
    }

    #[test]
    fn state_names_join_exactly() {
        let rows = [
            raw(1, "Texas", RawKey::Name, 190.0),
            raw(2, "TEXAS", RawKey::Name, 190.0),
        ];
        let out = normalize_rows(&rows, &FeatureLayer::from_state_names());

        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].key.id(), "48");
        assert_eq!(out.unmatched_names, vec![(2, "TEXAS".to_string())]);
    }
}
