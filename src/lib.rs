#![doc = "uvmap public API: joins UV irradiance measurements to state and county boundaries and drives the choropleth dashboard"]
mod aggregate;
mod classify;
mod dashboard;
mod error;
mod key;
mod map;
mod parse;
mod rank;
mod selection;
mod types;

pub mod io;

#[doc(inline)]
pub use key::{normalize_rows, state_name, GeoLevel, Normalized, RegionKey, Rejection};

#[doc(inline)]
pub use types::{AggregatedUnit, GeoFeature, MeasurementRecord};

#[doc(inline)]
pub use map::{Boundaries, FeatureLayer};

#[doc(inline)]
pub use parse::{
    parse_records, CsvLayout, KeySpec, Layout, ParseOutcome, RawKey, RawRecord, RecordFormat,
    SkipReason, SkippedRow, TokenLayout,
};

#[doc(inline)]
pub use aggregate::{
    AggregateQuery, Aggregation, Aggregator, AggregatorKind, Grouping, Mean, Median, RecordFilter, Sum,
};

#[doc(inline)]
pub use classify::{Bucket, BucketTable, Class, Floor, LegendEntry, Rgb};

#[doc(inline)]
pub use selection::{SelectionChange, SelectionState, SiblingFilter};

#[doc(inline)]
pub use rank::{RankedEntry, Ranking, SortOrder};

#[doc(inline)]
pub use dashboard::{Dashboard, DashboardConfig, LoadReport, Measure, Snapshot, UnitStyle};

#[doc(inline)]
pub use error::{BucketError, DashboardError, KeyError};
