use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use calamine::{open_workbook_auto, open_workbook_from_rs, Data, Reader, Xlsx};

use super::types::{CellValue, RawGrid};
use crate::error::AppError;

/// Reads one sheet of a workbook on disk, every cell untyped and no header row inferred.
pub fn read_excel_file_sheet(path: &Path, sheet_name: &str) -> Result<RawGrid, AppError> {
    tracing::info!("Opening workbook {}", path.display());
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        tracing::error!("Failed to open workbook {}: {}", path.display(), e);
        AppError::FileProcessingError(format!(
            "Failed to open workbook {}: {}",
            path.display(),
            e
        ))
    })?;

    let range = workbook.worksheet_range(sheet_name).map_err(|e| {
        AppError::FileProcessingError(format!("Failed to read worksheet {}: {}", sheet_name, e))
    })?;

    let grid = grid_from_range(&range);
    tracing::info!(
        "Loaded sheet {} as a {}x{} grid",
        sheet_name,
        grid.height(),
        grid.width()
    );
    Ok(grid)
}

/// Same as [`read_excel_file_sheet`] for an xlsx payload already in memory.
pub fn read_excel_bytes_sheet(file_data: Bytes, sheet_name: &str) -> Result<RawGrid, AppError> {
    let cursor = Cursor::new(file_data);
    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
        .map_err(|e| AppError::FileProcessingError(format!("Failed to open Excel file: {}", e)))?;

    let range = workbook.worksheet_range(sheet_name).map_err(|e| {
        AppError::FileProcessingError(format!("Failed to read worksheet {}: {}", sheet_name, e))
    })?;

    Ok(grid_from_range(&range))
}

/// calamine trims leading blank rows and columns; put them back so grid indices
/// match sheet indices.
pub fn grid_from_range(range: &calamine::Range<Data>) -> RawGrid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; col_offset];
        cells.extend(row.iter().map(CellValue::from));
        rows.push(cells);
    }

    RawGrid::new(rows)
}
