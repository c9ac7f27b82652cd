use std::ops::Range;

use super::types::{RawGrid, WideRecord, WideTable, YearSequence};
use super::utils::{clean_attribute, strip_footnote};
use crate::error::AppError;

pub const YEAR_HEADER_ROW: usize = 1;
pub const YEAR_COLUMNS: Range<usize> = 1..21;
pub const GROUP_LABEL_COLUMN: usize = 0;

/// Year labels from the standard header row.
pub fn extract_years(grid: &RawGrid) -> Result<YearSequence, AppError> {
    extract_years_at(grid, YEAR_HEADER_ROW, YEAR_COLUMNS)
}

pub fn extract_years_at(
    grid: &RawGrid,
    row: usize,
    cols: Range<usize>,
) -> Result<YearSequence, AppError> {
    let labels = grid.row_slice(row, cols)?.to_vec();
    tracing::debug!("Extracted {} year labels from row {}", labels.len(), row);
    Ok(YearSequence::new(labels))
}

/// Cuts one block of rows that share an attribute value (for example one sex)
/// out of the grid. Windows are taken as given; no layout discovery happens here.
#[allow(clippy::too_many_arguments)]
pub fn extract_block(
    grid: &RawGrid,
    years: &YearSequence,
    group_label_name: &str,
    row_range: Range<usize>,
    col_range: Range<usize>,
    attr_label_name: &str,
    attr_row: usize,
    attr_col: usize,
) -> Result<WideTable, AppError> {
    if col_range.len() != years.len() {
        return Err(AppError::YearMismatch {
            columns: col_range.len(),
            years: years.len(),
        });
    }

    let attribute = clean_attribute(&grid.cell(attr_row, attr_col)?.as_text());

    let records = row_range
        .clone()
        .map(|row| -> Result<WideRecord, AppError> {
            let group = strip_footnote(&grid.cell(row, GROUP_LABEL_COLUMN)?.as_text());
            let values = grid.row_slice(row, col_range.clone())?.to_vec();
            Ok(WideRecord {
                cause: None,
                attribute: attribute.clone(),
                group,
                values,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        "Extracted {} {} rows for {} = {} from rows {:?}",
        records.len(),
        group_label_name,
        attr_label_name,
        attribute,
        row_range
    );

    Ok(WideTable {
        attr_column: attr_label_name.to_string(),
        group_column: group_label_name.to_string(),
        years: years.clone(),
        records,
    })
}
