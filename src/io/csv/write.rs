//! CSV export of aggregation results.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::types::AggregatedUnit;

fn units_frame(units: &[AggregatedUnit]) -> Result<DataFrame> {
    let keys: Vec<String> = units.iter().map(|u| u.key.id().to_string()).collect();
    let names: Vec<String> = units.iter().map(|u| u.display_name.clone()).collect();
    let values: Vec<f64> = units.iter().map(|u| u.aggregate_value).collect();
    let counts: Vec<u64> = units.iter().map(|u| u.contributing_count as u64).collect();

    Ok(DataFrame::new(vec![
        Series::new("key".into(), keys).into(),
        Series::new("name".into(), names).into(),
        Series::new("value".into(), values).into(),
        Series::new("count".into(), counts).into(),
    ])?)
}

/// Write aggregated units to a CSV file: `key,name,value,count`.
pub fn write_units_csv(units: &[AggregatedUnit], path: &Path) -> Result<()> {
    let mut df = units_frame(units)?;
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}

/// Write aggregated units to a CSV string (for WASM/browser use).
pub fn units_to_csv_string(units: &[AggregatedUnit]) -> Result<String> {
    let mut df = units_frame(units)?;
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .finish(&mut df)
        .context("[io::csv::write] Failed to write CSV to string")?;
    String::from_utf8(buffer)
        .context("[io::csv::write] CSV output is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::RegionKey;

    #[test]
    fn keys_keep_leading_zeros() {
        let units = [AggregatedUnit {
            key: RegionKey::from_geoid("06037").unwrap(),
            display_name: "Los Angeles".into(),
            aggregate_value: 160.0,
            contributing_count: 2,
        }];
        let csv = units_to_csv_string(&units).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("key,name,value,count"));
        assert!(lines.next().unwrap().starts_with("06037,Los Angeles,160"));
    }
}
