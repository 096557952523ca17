use super::{build_record, KeySpec, ParseOutcome, SkipReason, TokenLayout};

pub(super) fn parse_delimited(input: &str, layout: &TokenLayout, delimiter: Option<char>) -> ParseOutcome {
    let required = layout.required_fields();
    let mut outcome = ParseOutcome::default();

    for (idx, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') { continue }

        let fields: Vec<&str> = match delimiter {
            Some(sep) => trimmed.split(sep).collect(),
            None => trimmed.split_whitespace().collect(),
        };

        let row = idx + 1;
        if fields.len() < required {
            outcome.push(row, Err(SkipReason::TooFewFields { found: fields.len(), required }));
            continue;
        }

        let field = |i: usize| fields.get(i).copied();
        let key = match &layout.key {
            KeySpec::Fips { state, county } => KeySpec::Fips { state: field(*state), county: field(*county) },
            KeySpec::Geoid(col) => KeySpec::Geoid(field(*col)),
            KeySpec::StateName => KeySpec::StateName,
        };
        outcome.push(row, build_record(row, field(layout.name), &key, field(layout.value)));
    }

    outcome
}
