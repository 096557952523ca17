//! Header-labeled CSV input.
//!
//! Short rows are padded with nulls and dropped field by field like any other
//! malformed row. Quoting errors are not: polars rejects the whole input, which is
//! reported as a single row-0 `Unreadable` skip with no rows kept.

use std::io::Cursor;

use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, PolarsResult, StringChunked}};

use super::{build_record, CsvLayout, KeySpec, ParseOutcome, SkipReason, SkippedRow};

/// Reads header-labeled CSV text into a DataFrame of string columns.
/// No schema inference, so FIPS codes keep their leading zeros.
fn read_frame(input: &str) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po.with_truncate_ragged_lines(true))
        .into_reader_with_file_handle(Cursor::new(input.as_bytes()))
        .finish()
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, SkipReason> {
    df.column(name)
        .and_then(|col| col.str())
        .map_err(|_| SkipReason::MissingColumn(name.to_string()))
}

type Columns<'a> = (&'a StringChunked, KeySpec<&'a StringChunked>, &'a StringChunked);

fn columns<'a>(df: &'a DataFrame, layout: &CsvLayout) -> Result<Columns<'a>, SkipReason> {
    let name = string_column(df, &layout.name)?;
    let key = match &layout.key {
        KeySpec::Fips { state, county } => KeySpec::Fips {
            state: string_column(df, state)?,
            county: string_column(df, county)?,
        },
        KeySpec::Geoid(col) => KeySpec::Geoid(string_column(df, col)?),
        KeySpec::StateName => KeySpec::StateName,
    };
    Ok((name, key, string_column(df, &layout.value)?))
}

pub(super) fn parse_csv(input: &str, layout: &CsvLayout) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    let df = match read_frame(input) {
        Ok(df) => df,
        Err(e) => {
            log::warn!("[parse::csv] failed to read CSV input: {e}");
            outcome.skipped.push(SkippedRow { row: 0, reason: SkipReason::Unreadable(e.to_string()) });
            return outcome;
        }
    };

    let (names, key_columns, values) = match columns(&df, layout) {
        Ok(columns) => columns,
        Err(reason) => {
            log::warn!("[parse::csv] {reason}");
            outcome.skipped.push(SkippedRow { row: 0, reason });
            return outcome;
        }
    };

    for idx in 0..df.height() {
        let key = match &key_columns {
            KeySpec::Fips { state, county } => KeySpec::Fips { state: state.get(idx), county: county.get(idx) },
            KeySpec::Geoid(col) => KeySpec::Geoid(col.get(idx)),
            KeySpec::StateName => KeySpec::StateName,
        };
        let row = idx + 1;
        outcome.push(row, build_record(row, names.get(idx), &key, values.get(idx)));
    }

    outcome
}
