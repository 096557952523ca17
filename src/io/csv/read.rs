//! Measurement file reading.

use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::parse::{parse_records, ParseOutcome, RecordFormat};

/// Reads a measurement file from `path` and parses it with `format`.
/// Malformed rows end up in [`ParseOutcome::skipped`]; only I/O failures are errors.
pub fn read_records(path: &Path, format: &RecordFormat) -> Result<ParseOutcome> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("[io::csv::read] Failed to open measurement file: {}", path.display()))?;
    log::info!("[io::csv::read] parsing {}", path.display());
    Ok(parse_records(&text, format))
}

/// Parses measurements from raw bytes (for WASM/browser use).
pub fn read_records_bytes(bytes: &[u8], format: &RecordFormat) -> Result<ParseOutcome> {
    let text = std::str::from_utf8(bytes)
        .context("[io::csv::read] Measurement input is not valid UTF-8")?;
    Ok(parse_records(text, format))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::parse::CsvLayout;

    #[test]
    fn reads_file_and_reports_missing_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "County,CountyFIPS,value\nLos Angeles,06037,150").unwrap();

        let format = RecordFormat::Csv(CsvLayout::county_fips());
        let outcome = read_records(file.path(), &format).unwrap();
        assert_eq!(outcome.rows.len(), 1);

        let err = read_records(Path::new("/nonexistent/uv.csv"), &format).unwrap_err();
        assert!(err.to_string().contains("[io::csv::read]"));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let format = RecordFormat::Csv(CsvLayout::county_fips());
        assert!(read_records_bytes(&[0xff, 0xfe, 0x00], &format).is_err());
    }
}
