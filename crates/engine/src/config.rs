use serde::Deserialize;

use crate::error::TriageError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Pipeline configuration. Every section has defaults matching the stock
/// bank-export layout, so `TriageConfig::default()` runs with no file at all.
#[derive(Debug, Clone, Deserialize)]
pub struct TriageConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub normalize: NormalizeConfig,
    #[serde(default)]
    pub key: KeyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            columns: ColumnConfig::default(),
            normalize: NormalizeConfig::default(),
            key: KeyConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn default_name() -> String {
    "default".into()
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Names of the input columns the pipeline consumes. Everything else is
/// pass-through.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnConfig {
    /// Counterparty/source label; part of the base key.
    #[serde(default = "default_account_name")]
    pub account_name: String,
    /// Secondary label, used only for tie-breaking. The column may be
    /// absent from the input entirely.
    #[serde(default = "default_secondary_name")]
    pub name: String,
    /// Text decimal amount; part of the base key.
    #[serde(default = "default_amount")]
    pub amount: String,
    /// Raw posting timestamp (`YYYYMMDDHHMMSS...`); feeds the `DATE`
    /// derivation and is dropped at the sink.
    #[serde(default = "default_posted")]
    pub posted: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            account_name: default_account_name(),
            name: default_secondary_name(),
            amount: default_amount(),
            posted: default_posted(),
        }
    }
}

fn default_account_name() -> String {
    "ACCOUNT_NAME".into()
}

fn default_secondary_name() -> String {
    "NAME".into()
}

fn default_amount() -> String {
    "TRNAMT".into()
}

fn default_posted() -> String {
    "DTPOSTED".into()
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizeConfig {
    /// Ordered substring → abbreviation rewrites for the account-name
    /// column. Matching is case-insensitive; entries apply independently
    /// in table order.
    #[serde(default = "default_abbreviations")]
    pub abbreviations: Vec<Abbreviation>,
    /// Columns removed outright when present.
    #[serde(default = "default_prune_columns")]
    pub prune_columns: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            abbreviations: default_abbreviations(),
            prune_columns: default_prune_columns(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Abbreviation {
    pub find: String,
    pub replace: String,
}

fn default_abbreviations() -> Vec<Abbreviation> {
    [
        ("Concord Medical Group", "CMG"),
        ("Great Lakes Emergency", "GLEP"),
        ("South Central Physicians", "SCP"),
        ("Mid West Hospital Phys", "MWHP"),
        ("CMG of KY", "CMGofKY"),
        ("Four Corners Emergency", "FCEP"),
        ("Western Mountain Hospital", "WMHP"),
        ("Concord Company of Tennessee", "CCofTN"),
        ("Concord North Texas", "CNT"),
        ("Delaware River Medicine", "DRM"),
    ]
    .into_iter()
    .map(|(find, replace)| Abbreviation {
        find: find.into(),
        replace: replace.into(),
    })
    .collect()
}

fn default_prune_columns() -> Vec<String> {
    ["DFI_ID", "ACCOUNT_NUMBER", "FITID", "CHECK_NO"]
        .into_iter()
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Key + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct KeyConfig {
    /// How many leading characters of the secondary label the tie-break
    /// appends to a colliding base key.
    #[serde(default = "default_tie_break_chars")]
    pub tie_break_chars: usize,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            tie_break_chars: default_tie_break_chars(),
        }
    }
}

fn default_tie_break_chars() -> usize {
    5
}

/// Sheet names for the rendered workbook, in tier order.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_cleaned_sheet")]
    pub cleaned: String,
    #[serde(default = "default_duplicates_sheet")]
    pub duplicates: String,
    #[serde(default = "default_double_duplicates_sheet")]
    pub double_duplicates: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cleaned: default_cleaned_sheet(),
            duplicates: default_duplicates_sheet(),
            double_duplicates: default_double_duplicates_sheet(),
        }
    }
}

fn default_cleaned_sheet() -> String {
    "Cleaned Data".into()
}

fn default_duplicates_sheet() -> String {
    "Duplicates".into()
}

fn default_double_duplicates_sheet() -> String {
    "Double Duplicates".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl TriageConfig {
    pub fn from_toml(input: &str) -> Result<Self, TriageError> {
        let config: TriageConfig =
            toml::from_str(input).map_err(|e| TriageError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TriageError> {
        for (label, value) in [
            ("columns.account_name", &self.columns.account_name),
            ("columns.name", &self.columns.name),
            ("columns.amount", &self.columns.amount),
            ("columns.posted", &self.columns.posted),
        ] {
            if value.is_empty() {
                return Err(TriageError::ConfigValidation(format!(
                    "{label} must not be empty"
                )));
            }
        }

        for (i, abbr) in self.normalize.abbreviations.iter().enumerate() {
            if abbr.find.trim().is_empty() {
                return Err(TriageError::ConfigValidation(format!(
                    "abbreviations[{i}]: find must not be empty"
                )));
            }
        }

        if self.key.tie_break_chars == 0 {
            return Err(TriageError::ConfigValidation(
                "key.tie_break_chars must be at least 1".into(),
            ));
        }

        let sheets = [
            &self.output.cleaned,
            &self.output.duplicates,
            &self.output.double_duplicates,
        ];
        if sheets.iter().any(|s| s.trim().is_empty()) {
            return Err(TriageError::ConfigValidation(
                "output sheet names must not be empty".into(),
            ));
        }
        if sheets[0] == sheets[1] || sheets[0] == sheets[2] || sheets[1] == sheets[2] {
            return Err(TriageError::ConfigValidation(
                "output sheet names must be distinct".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_stock_layout() {
        let config = TriageConfig::default();
        assert_eq!(config.columns.account_name, "ACCOUNT_NAME");
        assert_eq!(config.columns.posted, "DTPOSTED");
        assert_eq!(config.normalize.abbreviations.len(), 10);
        assert_eq!(config.normalize.prune_columns.len(), 4);
        assert_eq!(config.key.tie_break_chars, 5);
        assert_eq!(config.output.cleaned, "Cleaned Data");
        config.validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_is_default() {
        let config = TriageConfig::from_toml("").unwrap();
        assert_eq!(config.name, "default");
        assert_eq!(config.output.double_duplicates, "Double Duplicates");
    }

    #[test]
    fn parse_overrides() {
        let input = r#"
name = "June close"

[columns]
amount = "AMOUNT"

[key]
tie_break_chars = 3

[[normalize.abbreviations]]
find = "Acme Corporation"
replace = "ACME"

[output]
cleaned = "Clean"
"#;
        let config = TriageConfig::from_toml(input).unwrap();
        assert_eq!(config.name, "June close");
        assert_eq!(config.columns.amount, "AMOUNT");
        // Unspecified columns keep their defaults
        assert_eq!(config.columns.account_name, "ACCOUNT_NAME");
        assert_eq!(config.key.tie_break_chars, 3);
        assert_eq!(config.normalize.abbreviations.len(), 1);
        assert_eq!(config.normalize.abbreviations[0].replace, "ACME");
        assert_eq!(config.output.cleaned, "Clean");
        assert_eq!(config.output.duplicates, "Duplicates");
    }

    #[test]
    fn reject_zero_tie_break() {
        let err = TriageConfig::from_toml("[key]\ntie_break_chars = 0\n").unwrap_err();
        assert!(err.to_string().contains("tie_break_chars"));
    }

    #[test]
    fn reject_empty_abbreviation_find() {
        let input = r#"
[[normalize.abbreviations]]
find = "  "
replace = "X"
"#;
        let err = TriageConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("find"));
    }

    #[test]
    fn reject_colliding_sheet_names() {
        let input = r#"
[output]
cleaned = "Sheet"
duplicates = "Sheet"
"#;
        let err = TriageConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("distinct"));
    }
}
