use crate::key::RegionKey;

/// One UV observation joined to its region key.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub region_name: String,
    pub key: RegionKey,
    pub value: f64, // irradiation, mW/m², finite and non-negative
}

impl MeasurementRecord {
    pub fn new(region_name: impl Into<String>, key: RegionKey, value: f64) -> Self {
        Self { region_name: region_name.into(), key, value }
    }
}
