use chrono::NaiveDate;

use crate::config::TriageConfig;
use crate::model::{Table, DATE_COLUMN};

/// Normalize a raw record table: rewrite account names through the
/// abbreviation table, prune noise columns, and derive the `DATE` column.
///
/// Pure transformation, same cardinality in and out. Idempotent: running it
/// on its own output changes nothing (the abbreviation table is canonical
/// and the date step skips when `DATE` already exists).
pub fn normalize(table: &Table, config: &TriageConfig) -> Table {
    let mut out = table.clone();
    abbreviate(&mut out, config);
    prune_columns(&mut out, config);
    derive_dates(&mut out, config);
    out
}

/// Apply every abbreviation entry, in table order, to the account-name
/// column. Null values pass through; a value may be rewritten by more than
/// one entry.
fn abbreviate(table: &mut Table, config: &TriageConfig) {
    let Some(col) = table.column_index(&config.columns.account_name) else {
        return;
    };
    for abbr in &config.normalize.abbreviations {
        for row in &mut table.rows {
            if let Some(value) = &row[col] {
                if let Some(rewritten) = replace_fold_case(value, &abbr.find, &abbr.replace) {
                    row[col] = Some(rewritten);
                }
            }
        }
    }
}

/// Replace every case-insensitive occurrence of `needle` in `value`.
/// Returns None when nothing matched.
fn replace_fold_case(value: &str, needle: &str, replacement: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let hay = value.to_ascii_lowercase();
    let pat = needle.to_ascii_lowercase();
    let mut out = String::with_capacity(value.len());
    let mut at = 0;
    while let Some(pos) = hay[at..].find(&pat) {
        let start = at + pos;
        out.push_str(&value[at..start]);
        out.push_str(replacement);
        at = start + pat.len();
    }
    if at == 0 {
        return None;
    }
    out.push_str(&value[at..]);
    Some(out)
}

fn prune_columns(table: &mut Table, config: &TriageConfig) {
    for name in &config.normalize.prune_columns {
        table.drop_column(name);
    }
}

/// Insert `DATE` as column 0, parsed from the first 8 characters of the
/// posted-timestamp column. Null on absent or unparseable input. Skipped
/// entirely when a `DATE` column already exists.
fn derive_dates(table: &mut Table, config: &TriageConfig) {
    if table.column_index(DATE_COLUMN).is_some() {
        return;
    }
    let posted = table.column_index(&config.columns.posted);
    let values = table
        .rows
        .iter()
        .map(|row| {
            posted
                .and_then(|col| row[col].as_deref())
                .and_then(parse_posted_date)
        })
        .collect();
    table.insert_column(0, DATE_COLUMN, values);
}

/// `YYYYMMDDHHMMSS...` → `MM/DD/YYYY`, using only the first 8 characters.
fn parse_posted_date(raw: &str) -> Option<String> {
    let date = raw.get(0..8)?;
    let parsed = NaiveDate::parse_from_str(date, "%Y%m%d").ok()?;
    Some(parsed.format("%m/%d/%Y").to_string())
}
