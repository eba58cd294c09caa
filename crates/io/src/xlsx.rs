// XLSX sink — renders classified tiers as a three-sheet workbook

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};

use ledgersift_engine::config::TriageConfig;
use ledgersift_engine::model::{Table, TriageResult, DATE_COLUMN, ID_COLUMN};

/// Counters describing what a single export wrote.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub sheets_written: usize,
    pub rows_written: usize,
    pub rows_suppressed: usize,
}

/// Write the three tiers as named worksheets, in tier order.
///
/// Contract per sheet:
/// - the posted-timestamp column is dropped just before emission (it has
///   served its purpose feeding the `DATE` derivation);
/// - rows whose every remaining field is null/blank are suppressed —
///   uniformly, on all three sheets;
/// - `DATE` and `ID` cells carry the opaque-text number format (`@`) so a
///   value like `06/06/2025` or a digit-heavy key is never reinterpreted
///   by a spreadsheet application;
/// - column order is otherwise preserved.
///
/// One atomic save at the end; nothing partial is left on failure.
pub fn export(
    result: &TriageResult,
    path: &Path,
    config: &TriageConfig,
) -> Result<ExportSummary, String> {
    let mut workbook = Workbook::new();
    let mut summary = ExportSummary::default();

    let sheets = [
        (config.output.cleaned.as_str(), &result.tiers.unique),
        (config.output.duplicates.as_str(), &result.tiers.duplicate),
        (
            config.output.double_duplicates.as_str(),
            &result.tiers.double_duplicate,
        ),
    ];

    for (name, tier) in sheets {
        let worksheet = workbook
            .add_worksheet()
            .set_name(name)
            .map_err(|e| format!("cannot create sheet '{name}': {e}"))?;

        let mut view = tier.clone();
        view.drop_column(&config.columns.posted);

        let (written, suppressed) = write_sheet(worksheet, &view)?;
        summary.sheets_written += 1;
        summary.rows_written += written;
        summary.rows_suppressed += suppressed;
    }

    workbook
        .save(path)
        .map_err(|e| format!("cannot save workbook: {e}"))?;

    Ok(summary)
}

fn write_sheet(worksheet: &mut Worksheet, table: &Table) -> Result<(usize, usize), String> {
    let text = Format::new().set_num_format("@");
    let opaque_cols = [
        table.column_index(DATE_COLUMN),
        table.column_index(ID_COLUMN),
    ];

    for (col, header) in table.columns.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(|e| format!("cannot write header '{header}': {e}"))?;
    }

    let mut written = 0;
    let mut suppressed = 0;
    for row in &table.rows {
        if Table::is_blank_row(row) {
            suppressed += 1;
            continue;
        }
        let row_idx = (written + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let Some(value) = cell.as_deref() else {
                continue;
            };
            let result = if opaque_cols.contains(&Some(col)) {
                worksheet.write_string_with_format(row_idx, col as u16, value, &text)
            } else {
                worksheet.write_string(row_idx, col as u16, value)
            };
            result.map_err(|e| format!("cannot write cell: {e}"))?;
        }
        written += 1;
    }

    Ok((written, suppressed))
}
