use serde::Serialize;

use crate::key::RegionKey;

/// Summary of every record joined to one geographic unit.
/// Units only exist for features with at least one contributing record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedUnit {
    pub key: RegionKey,
    pub display_name: String,
    pub aggregate_value: f64,
    pub contributing_count: usize,
}
