use crate::classify::id_counts;
use crate::model::{Table, TierSet, TriageSummary, ID_COLUMN};

/// Compute summary statistics from the keyed table and its partition.
pub fn compute_summary(keyed: &Table, tiers: &TierSet) -> TriageSummary {
    let counts = id_counts(keyed);
    let candidate_groups = counts.values().filter(|&&n| n >= 2).count();

    let unkeyed = keyed.column_index(ID_COLUMN).map_or(keyed.row_count(), |c| {
        keyed.rows.iter().filter(|row| row[c].is_none()).count()
    });

    TriageSummary {
        total_records: keyed.row_count(),
        unique: tiers.unique.row_count(),
        duplicates: tiers.duplicate.row_count(),
        double_duplicates: tiers.double_duplicate.row_count(),
        unkeyed,
        candidate_groups,
    }
}
