use chrono::NaiveDate;

use crate::config::TriageConfig;
use crate::model::{Cell, Table, DATE_COLUMN, ID_COLUMN};

/// Spreadsheet serial-date epoch. Day counts relative to this date match
/// what a reviewer sees when a spreadsheet coerces a date to a number.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Signed day count from the serial epoch.
pub fn serial_date(date: NaiveDate) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(SERIAL_EPOCH.0, SERIAL_EPOCH.1, SERIAL_EPOCH.2)
        .expect("valid epoch");
    date.signed_duration_since(epoch).num_days()
}

/// Assign the base identity key to every record, inserted as a column right
/// after `DATE`.
///
/// The key is `trim(account) + serial(date) + trim(amount)` — plain
/// concatenation, not a hash: it must be stable across runs, independent of
/// row order, and reproducible by hand from the visible columns. Null when
/// any component is null or the date does not parse. The key is a grouping
/// handle only; nothing downstream re-parses it.
pub fn assign_ids(table: &Table, config: &TriageConfig) -> Table {
    let account_col = table.column_index(&config.columns.account_name);
    let date_col = table.column_index(DATE_COLUMN);
    let amount_col = table.column_index(&config.columns.amount);

    let ids: Vec<Cell> = table
        .rows
        .iter()
        .map(|row| {
            let get = |col: Option<usize>| col.and_then(|c| row[c].as_deref());
            build_id(get(account_col), get(date_col), get(amount_col))
        })
        .collect();

    let at = date_col.map_or(0, |c| c + 1);
    let mut out = table.clone();
    out.insert_column(at, ID_COLUMN, ids);
    out
}

fn build_id(account: Option<&str>, date: Option<&str>, amount: Option<&str>) -> Cell {
    let (account, date, amount) = (account?, date?, amount?);
    let parsed = NaiveDate::parse_from_str(date, "%m/%d/%Y").ok()?;
    Some(format!(
        "{}{}{}",
        account.trim(),
        serial_date(parsed),
        amount.trim()
    ))
}

/// Rewrite identity keys with the secondary-label discriminator: append the
/// first `tie_break_chars` characters of the name column to every non-null
/// key whose row also has a non-null name. Applied only to the
/// duplicate-candidate set; since it only appends to the base key, it can
/// split a collision group but never merge two distinct ones.
pub fn tie_break_ids(table: &Table, config: &TriageConfig) -> Table {
    let mut out = table.clone();
    let Some(id_col) = out.column_index(ID_COLUMN) else {
        return out;
    };
    let Some(name_col) = out.column_index(&config.columns.name) else {
        return out;
    };

    for row in &mut out.rows {
        let suffix: Option<String> = row[name_col]
            .as_deref()
            .map(|name| name.chars().take(config.key.tie_break_chars).collect());
        let Some(suffix) = suffix else {
            continue;
        };
        if let Some(id) = row[id_col].take() {
            row[id_col] = Some(format!("{id}{suffix}"));
        }
    }
    out
}
