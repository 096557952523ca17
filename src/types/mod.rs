mod feature;
mod record;
mod unit;

pub use feature::GeoFeature;
pub use record::MeasurementRecord;
pub use unit::AggregatedUnit;
