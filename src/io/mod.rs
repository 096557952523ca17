//! Loader and export adapters around the core.
//!
//! Reading files, decoding GeoJSON and writing results are the caller's side of the
//! pipeline. Everything here returns `anyhow::Result` with the failing path in context.

mod csv;
mod geojson;

pub use csv::{read_records, read_records_bytes, units_to_csv_string, write_units_csv};
pub use geojson::{read_features, read_features_bytes, styles_to_geojson, FeatureProps};
