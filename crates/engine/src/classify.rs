use std::collections::HashMap;

use crate::config::TriageConfig;
use crate::key::tie_break_ids;
use crate::model::{Table, TierSet, ID_COLUMN};

/// Partition a keyed table into the three confidence tiers.
///
/// Two sequential collision passes over progressively narrower sets:
///
/// 1. Group the full table by `ID`. Null keys never collide — each
///    null-keyed record is solitary and lands in the unique tier along
///    with every key that occurs exactly once. Colliding records form the
///    duplicate-candidate set.
/// 2. Rewrite the candidate set's keys with the tie-break discriminator,
///    then group again. Keys now unique become the duplicate tier; keys
///    still colliding become the double-duplicate tier.
///
/// The partition is stable: rows keep input order within each tier. Each
/// stage produces a new table; nothing is rewritten in place.
pub fn classify(table: &Table, config: &TriageConfig) -> TierSet {
    let (unique, candidates) = split_by_collision(table);

    let rewritten = tie_break_ids(&candidates, config);
    let (duplicate, double_duplicate) = split_by_collision(&rewritten);

    TierSet {
        unique,
        duplicate,
        double_duplicate,
    }
}

/// Stable split into (solitary, colliding) by `ID` occurrence count.
/// Null keys count as solitary.
fn split_by_collision(table: &Table) -> (Table, Table) {
    let counts = id_counts(table);
    let id_col = table.column_index(ID_COLUMN);

    let mut solitary = Table::new(table.columns.clone());
    let mut colliding = Table::new(table.columns.clone());

    for row in &table.rows {
        let collides = id_col
            .and_then(|c| row[c].as_deref())
            .map_or(false, |id| counts[id] >= 2);
        if collides {
            colliding.rows.push(row.clone());
        } else {
            solitary.rows.push(row.clone());
        }
    }

    (solitary, colliding)
}

/// Occurrence count per non-null `ID`.
pub(crate) fn id_counts(table: &Table) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    if let Some(id_col) = table.column_index(ID_COLUMN) {
        for row in &table.rows {
            if let Some(id) = row[id_col].as_deref() {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
    }
    counts
}
