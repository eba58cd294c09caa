use std::collections::HashSet;

use crate::classify::classify;
use crate::config::TriageConfig;
use crate::error::TriageError;
use crate::key::assign_ids;
use crate::model::{Table, TriageMeta, TriageResult};
use crate::normalize::normalize;
use crate::summary::compute_summary;

/// Run the full pipeline over a pre-loaded record table:
/// normalize → key → classify → summarize.
///
/// Each stage returns a new table; the input is never mutated. The only
/// failure mode on well-formed input is a repeated consumed column in the
/// header — everything else degrades to null keys per policy.
pub fn run(config: &TriageConfig, input: &Table) -> Result<TriageResult, TriageError> {
    check_consumed_columns(config, input)?;

    let normalized = normalize(input, config);
    let keyed = assign_ids(&normalized, config);
    let tiers = classify(&keyed, config);
    let summary = compute_summary(&keyed, &tiers);

    Ok(TriageResult {
        meta: TriageMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        tiers,
    })
}

/// Name-based lookup resolves to the first matching header, so a consumed
/// column appearing twice would silently key off the wrong data. Reject it.
fn check_consumed_columns(config: &TriageConfig, input: &Table) -> Result<(), TriageError> {
    let consumed: HashSet<&str> = [
        config.columns.account_name.as_str(),
        config.columns.name.as_str(),
        config.columns.amount.as_str(),
        config.columns.posted.as_str(),
    ]
    .into();

    let mut seen = HashSet::new();
    for column in &input.columns {
        if consumed.contains(column.as_str()) && !seen.insert(column.as_str()) {
            return Err(TriageError::DuplicateColumn(column.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;

    fn raw(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::new(columns.iter().map(|c| (*c).to_string()).collect());
        for row in rows {
            t.push_row(
                row.iter()
                    .map(|v| {
                        if v.is_empty() {
                            None
                        } else {
                            Some((*v).to_string())
                        }
                    })
                    .collect::<Vec<Cell>>(),
            );
        }
        t
    }

    #[test]
    fn end_to_end_partition() {
        let input = raw(
            &["ACCOUNT_NAME", "NAME", "TRNAMT", "DTPOSTED", "FITID"],
            &[
                &["Concord Medical Group", "Alpha", "100.00", "20250606120000", "f1"],
                &["Concord Medical Group", "Beta", "100.00", "20250606093000", "f2"],
                &["Great Lakes Emergency", "Gamma", "75.00", "20250607120000", "f3"],
                &["South Central Physicians", "Delta", "20.00", "", "f4"],
            ],
        );
        let result = run(&TriageConfig::default(), &input).unwrap();

        // FITID pruned, DATE + ID prepended
        assert_eq!(
            result.tiers.unique.columns,
            vec!["DATE", "ID", "ACCOUNT_NAME", "NAME", "TRNAMT", "DTPOSTED"]
        );

        // Abbreviated names share one base key → tie-break resolves them
        assert_eq!(result.summary.duplicates, 2);
        assert_eq!(result.tiers.duplicate.value(0, "ACCOUNT_NAME"), Some("CMG"));
        assert_eq!(
            result.tiers.duplicate.value(0, "ID"),
            Some("CMG45814100.00Alpha")
        );

        // GLEP is unique; SCP has no posting date → unkeyed, folded into
        // the unique tier
        assert_eq!(result.summary.unique, 2);
        assert_eq!(result.summary.unkeyed, 1);
        assert_eq!(result.summary.total_records, 4);
    }

    #[test]
    fn meta_carries_config_name_and_version() {
        let input = raw(&["ACCOUNT_NAME"], &[&["CMG"]]);
        let result = run(&TriageConfig::default(), &input).unwrap();
        assert_eq!(result.meta.config_name, "default");
        assert_eq!(result.meta.engine_version, env!("CARGO_PKG_VERSION"));
        assert!(!result.meta.run_at.is_empty());
    }

    #[test]
    fn reject_repeated_consumed_column() {
        let input = raw(
            &["ACCOUNT_NAME", "TRNAMT", "TRNAMT"],
            &[&["CMG", "1.00", "2.00"]],
        );
        let err = run(&TriageConfig::default(), &input).unwrap_err();
        assert!(err.to_string().contains("TRNAMT"));
    }

    #[test]
    fn repeated_passthrough_column_is_fine() {
        let input = raw(
            &["ACCOUNT_NAME", "MEMO", "MEMO"],
            &[&["CMG", "a", "b"]],
        );
        assert!(run(&TriageConfig::default(), &input).is_ok());
    }

    #[test]
    fn empty_input_yields_empty_tiers() {
        let input = raw(&["ACCOUNT_NAME", "TRNAMT", "DTPOSTED"], &[]);
        let result = run(&TriageConfig::default(), &input).unwrap();
        assert_eq!(result.summary.total_records, 0);
        assert!(result.tiers.unique.is_empty());
        assert!(result.tiers.duplicate.is_empty());
        assert!(result.tiers.double_duplicate.is_empty());
    }

    #[test]
    fn result_serializes_to_json() {
        let input = raw(
            &["ACCOUNT_NAME", "TRNAMT", "DTPOSTED"],
            &[&["CMG", "100.00", "20250606120000"]],
        );
        let result = run(&TriageConfig::default(), &input).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["summary"]["total_records"], 1);
        assert_eq!(json["tiers"]["unique"]["rows"][0][1], "CMG45814100.00");
    }
}
