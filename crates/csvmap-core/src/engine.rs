//! Mapping engine: turns source rows into output rows according to mapping rules
//!
//! Every rule is evaluated against the same source row. Separate rules fan the
//! row out into the cartesian product of their values; Combine and Normal
//! rules contribute the same value to every resulting row. Fields are written
//! Separate first, then Combine, then Normal, and that write order is also the
//! order of values in the row identifier.

use crate::mapping::{Action, MappingRule};
use crate::table::{OutputRow, SourceRow};
use indexmap::IndexMap;

type Fields = IndexMap<String, Option<String>>;

/// Map every source row, preserving source order
pub fn transform(rows: &[SourceRow], rules: &[MappingRule]) -> Vec<OutputRow> {
    let output: Vec<OutputRow> = rows.iter().flat_map(|row| map_row(row, rules)).collect();

    tracing::debug!(
        source_rows = rows.len(),
        rules = rules.len(),
        output_rows = output.len(),
        "transformed rows"
    );

    output
}

/// Map a single source row into zero or more output rows
pub fn map_row(row: &SourceRow, rules: &[MappingRule]) -> Vec<OutputRow> {
    let separated: Vec<(&str, Vec<Option<&str>>)> = rules_with(rules, Action::Separate)
        .map(|rule| {
            let values = rule.source_columns.iter().map(|c| row.get(c)).collect();
            (rule.target_column.as_str(), values)
        })
        .collect();

    let mut mapped = Fields::new();
    for rule in rules_with(rules, Action::Combine) {
        let value = rule
            .source_columns
            .iter()
            .map(|c| row.get(c).unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ");
        mapped.insert(rule.target_column.clone(), Some(value));
    }
    for rule in rules_with(rules, Action::Normal) {
        let value = rule
            .source_columns
            .first()
            .and_then(|c| row.get(c))
            .map(str::to_string);
        mapped.insert(rule.target_column.clone(), value);
    }

    if separated.is_empty() {
        return vec![OutputRow::new(mapped)];
    }

    expand(&separated)
        .into_iter()
        .map(|mut fields| {
            for (column, value) in &mapped {
                fields.insert(column.clone(), value.clone());
            }
            OutputRow::new(fields)
        })
        .collect()
}

fn rules_with(rules: &[MappingRule], action: Action) -> impl Iterator<Item = &MappingRule> {
    rules.iter().filter(move |r| r.action == action)
}

/// Cartesian product of the separated values, seeded with one empty row.
///
/// Each rule multiplies the partial rows value-major: all partial rows with
/// the first value, then all partial rows with the second, and so on. A rule
/// with no values empties the product.
fn expand(separated: &[(&str, Vec<Option<&str>>)]) -> Vec<Fields> {
    separated
        .iter()
        .fold(vec![Fields::new()], |partials, (target, values)| {
            let mut expanded = Vec::with_capacity(partials.len() * values.len());
            for value in values {
                for partial in &partials {
                    let mut next = partial.clone();
                    next.insert(target.to_string(), value.map(str::to_string));
                    expanded.push(next);
                }
            }
            expanded
        })
}
