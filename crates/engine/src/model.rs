use serde::Serialize;

/// Name of the derived calendar-date column, always column 0 after
/// normalization.
pub const DATE_COLUMN: &str = "DATE";

/// Name of the derived identity-key column, inserted after `DATE`.
pub const ID_COLUMN: &str = "ID";

/// A single field value. `None` is null/missing; all present values are text.
pub type Cell = Option<String>;

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An in-memory record set: a header row plus rows of nullable text cells.
///
/// Column lookup is by name and resolves to the first matching header. Every
/// row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Index of the first column named `name`, if any.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row, padding or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// Non-null value of `name` in row `row`, if both exist.
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let col = self.column_index(name)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Insert a column at `index` with one value per existing row.
    ///
    /// `values` must have one entry per row; missing entries become null.
    pub fn insert_column(&mut self, index: usize, name: &str, values: Vec<Cell>) {
        let index = index.min(self.columns.len());
        self.columns.insert(index, name.to_string());
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.insert(index, values.next().flatten());
        }
    }

    /// Remove the first column named `name`. Returns false when absent.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        true
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A row is blank when every cell is null or whitespace-only.
    pub fn is_blank_row(row: &[Cell]) -> bool {
        row.iter()
            .all(|cell| cell.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Confidence tier for a classified record. Escalating tiers reflect an
/// unresolved key collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Unique,
    Duplicate,
    DoubleDuplicate,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unique => write!(f, "unique"),
            Self::Duplicate => write!(f, "duplicate"),
            Self::DoubleDuplicate => write!(f, "double_duplicate"),
        }
    }
}

/// The three output partitions. Mutually exclusive; together with row order
/// preserved they reconstruct the normalized input.
#[derive(Debug, Clone, Serialize)]
pub struct TierSet {
    pub unique: Table,
    pub duplicate: Table,
    pub double_duplicate: Table,
}

impl TierSet {
    /// Tiers in output order, paired with their tier tag.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &Table)> + '_ {
        [
            (Tier::Unique, &self.unique),
            (Tier::Duplicate, &self.duplicate),
            (Tier::DoubleDuplicate, &self.double_duplicate),
        ]
        .into_iter()
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageSummary {
    pub total_records: usize,
    pub unique: usize,
    pub duplicates: usize,
    pub double_duplicates: usize,
    /// Records with a null identity key, folded into the unique tier
    /// without entering collision detection.
    pub unkeyed: usize,
    /// Distinct base keys that collided in pass 1.
    pub candidate_groups: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriageMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriageResult {
    pub meta: TriageMeta,
    pub summary: TriageSummary,
    pub tiers: TierSet,
}
