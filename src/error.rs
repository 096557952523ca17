use thiserror::Error;

use crate::key::{GeoLevel, RegionKey};

/// Rejections raised while deriving a `RegionKey`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// A code is numeric but not of the fixed width its level requires, so joining
    /// it could attribute data to the wrong region.
    #[error("ambiguous {field} code {value:?}: expected {expected}")]
    AmbiguousKey { field: &'static str, value: String, expected: &'static str },

    /// A code contains something other than ASCII digits.
    #[error("{field} code {value:?} is not numeric")]
    NotNumeric { field: &'static str, value: String },

    /// Two boundary features normalize to the same key.
    #[error("duplicate boundary feature for key {0}")]
    DuplicateFeature(RegionKey),

    /// A feature was added to a layer of a different level.
    #[error("feature {key} is a {found:?} unit but the layer holds {expected:?} units")]
    LevelMismatch { key: RegionKey, expected: GeoLevel, found: GeoLevel },
}

/// Invalid bucket table definitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BucketError {
    #[error("bucket table {0:?} has no buckets")]
    Empty(String),

    #[error("bucket table {table:?}: bound {bound} is not finite")]
    NonFinite { table: String, bound: f64 },

    #[error("bucket table {table:?}: bound {bound} does not exceed the previous bound {previous}")]
    NotAscending { table: String, previous: f64, bound: f64 },

    #[error("bucket table {table:?}: no-data color {color} is also used by a measured class")]
    NoDataCollision { table: String, color: String },
}

/// Errors surfaced by the dashboard's event handlers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("dashboard has no data loaded yet")]
    NotReady,

    #[error("unit {0} is not a feature of the map layer")]
    UnknownUnit(RegionKey),

    #[error("{count} record(s) carry ambiguous keys, first: {first}")]
    AmbiguousKeys { count: usize, first: KeyError },

    #[error(transparent)]
    Key(#[from] KeyError),
}
