//! Record parsing: raw measurement text into typed rows.
//!
//! Parsing is total. Malformed rows are dropped and reported in
//! [`ParseOutcome::skipped`]; nothing in here returns an error.

mod csv;
mod delimited;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the region key of a row comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySpec<C> {
    /// Separate 2-digit state and 3-digit county code columns.
    Fips { state: C, county: C },
    /// One combined GEOID column (2 or 5 digits).
    Geoid(C),
    /// The name column, joined against state display names.
    StateName,
}

/// Column mapping for one input format. `C` is a header name for CSV input and a
/// zero-based position for delimited input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout<C> {
    pub name: C,
    pub key: KeySpec<C>,
    pub value: C,
}

pub type CsvLayout = Layout<String>;
pub type TokenLayout = Layout<usize>;

impl CsvLayout {
    /// `County,CountyFIPS,value`, the layout of the county irradiation export.
    pub fn county_fips() -> Self {
        Self {
            name: "County".into(),
            key: KeySpec::Geoid("CountyFIPS".into()),
            value: "value".into(),
        }
    }
}

impl TokenLayout {
    /// Number of fields a row must have for every mapped position to exist.
    fn required_fields(&self) -> usize {
        let key_max = match &self.key {
            KeySpec::Fips { state, county } => (*state).max(*county),
            KeySpec::Geoid(col) => *col,
            KeySpec::StateName => 0,
        };
        self.name.max(self.value).max(key_max) + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFormat {
    /// Header-labeled CSV; columns are looked up by name.
    Csv(CsvLayout),
    /// One record per line, fields split on `delimiter` or on runs of whitespace
    /// when `None`. Blank lines and lines starting with `#` are ignored.
    Delimited { layout: TokenLayout, delimiter: Option<char> },
}

/// Key fields of a row, trimmed and checked to be digits but not yet normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKey {
    Fips { state: String, county: String },
    Geoid(String),
    Name,
}

/// One well-formed input row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub row: usize,
    pub name: String,
    pub key: RawKey,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    TooFewFields { found: usize, required: usize },
    MissingField(&'static str),
    NotNumeric { field: &'static str, value: String },
    NonFinite(String),
    Negative(f64),
    MissingColumn(String),
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewFields { found, required } => write!(f, "{found} field(s), {required} required"),
            SkipReason::MissingField(field) => write!(f, "missing {field}"),
            SkipReason::NotNumeric { field, value } => write!(f, "{field} {value:?} is not numeric"),
            SkipReason::NonFinite(value) => write!(f, "value {value:?} is not finite"),
            SkipReason::Negative(value) => write!(f, "value {value} is negative"),
            SkipReason::MissingColumn(column) => write!(f, "column {column:?} not in header"),
            SkipReason::Unreadable(msg) => write!(f, "unreadable input: {msg}"),
        }
    }
}

/// A dropped row. `row` is 1-based; 0 refers to the input as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub rows: Vec<RawRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl ParseOutcome {
    fn push(&mut self, row: usize, parsed: Result<RawRecord, SkipReason>) {
        match parsed {
            Ok(record) => self.rows.push(record),
            Err(reason) => {
                log::debug!("[parse] skipping row {row}: {reason}");
                self.skipped.push(SkippedRow { row, reason });
            }
        }
    }
}

/// Parses `input` according to `format`.
pub fn parse_records(input: &str, format: &RecordFormat) -> ParseOutcome {
    let outcome = match format {
        RecordFormat::Csv(layout) => csv::parse_csv(input, layout),
        RecordFormat::Delimited { layout, delimiter } => delimited::parse_delimited(input, layout, *delimiter),
    };
    if !outcome.skipped.is_empty() {
        log::warn!("[parse] dropped {} malformed row(s), kept {}", outcome.skipped.len(), outcome.rows.len());
    }
    outcome
}

/// Validates the fields of one row, shared by both formats.
fn build_record(
    row: usize,
    name: Option<&str>,
    key: &KeySpec<Option<&str>>,
    value: Option<&str>,
) -> Result<RawRecord, SkipReason> {
    let name = name.map(str::trim).unwrap_or_default();
    let key = match key {
        KeySpec::Fips { state, county } => RawKey::Fips {
            state: digits("state", *state)?,
            county: digits("county", *county)?,
        },
        KeySpec::Geoid(geoid) => RawKey::Geoid(digits("geoid", *geoid)?),
        KeySpec::StateName if name.is_empty() => return Err(SkipReason::MissingField("name")),
        KeySpec::StateName => RawKey::Name,
    };
    let value = number("value", value)?;
    Ok(RawRecord { row, name: name.to_string(), key, value })
}

/// A code field: trimmed, non-empty, base-10 digits only. Width is checked later
/// by the key constructors, where it is a rejection rather than a dropped row.
fn digits(field: &'static str, raw: Option<&str>) -> Result<String, SkipReason> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(SkipReason::MissingField(field))?;
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SkipReason::NotNumeric { field, value: raw.to_string() });
    }
    Ok(raw.to_string())
}

fn number(field: &'static str, raw: Option<&str>) -> Result<f64, SkipReason> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(SkipReason::MissingField(field))?;
    let value: f64 = raw.parse().map_err(|_| SkipReason::NotNumeric { field, value: raw.to_string() })?;
    if !value.is_finite() { return Err(SkipReason::NonFinite(raw.to_string())) }
    if value < 0.0 { return Err(SkipReason::Negative(value)) }
    Ok(value)
}
