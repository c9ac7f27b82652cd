use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

use super::extractor::{extract_block, YEAR_COLUMNS, YEAR_HEADER_ROW};
use super::types::{RawGrid, WideTable, YearSequence};
use crate::error::AppError;

pub const AGE_GROUP_COLUMN: &str = "age_group";
pub const RACE_COLUMN: &str = "race";
pub const SEX_COLUMN: &str = "sex";

/// Where one homogeneous block sits in the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub group_label: String,
    pub rows: Range<usize>,
    pub cols: Range<usize>,
    pub attr_label: String,
    pub attr_cell: (usize, usize),
}

impl BlockSpec {
    pub fn new(
        group_label: &str,
        rows: Range<usize>,
        cols: Range<usize>,
        attr_label: &str,
        attr_cell: (usize, usize),
    ) -> Self {
        Self {
            group_label: group_label.to_string(),
            rows,
            cols,
            attr_label: attr_label.to_string(),
            attr_cell,
        }
    }

    pub fn extract(&self, grid: &RawGrid, years: &YearSequence) -> Result<WideTable, AppError> {
        extract_block(
            grid,
            years,
            &self.group_label,
            self.rows.clone(),
            self.cols.clone(),
            &self.attr_label,
            self.attr_cell.0,
            self.attr_cell.1,
        )
    }
}

/// Block positions for one report sheet. The default matches the published
/// overdose mortality tables and breaks if their layout shifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub year_row: usize,
    pub year_cols: Range<usize>,
    pub age_blocks: Vec<BlockSpec>,
    pub race_blocks: Vec<BlockSpec>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        let age = |rows: Range<usize>, sex_row: usize| {
            BlockSpec::new(AGE_GROUP_COLUMN, rows, YEAR_COLUMNS, SEX_COLUMN, (sex_row, 0))
        };
        let race = |rows: Range<usize>, sex_row: usize| {
            BlockSpec::new(RACE_COLUMN, rows, YEAR_COLUMNS, SEX_COLUMN, (sex_row, 0))
        };

        Self {
            year_row: YEAR_HEADER_ROW,
            year_cols: YEAR_COLUMNS,
            age_blocks: vec![age(5..14, 2), age(17..26, 14), age(29..38, 26)],
            race_blocks: vec![race(40..51, 39), race(52..63, 51)],
        }
    }
}

impl SheetLayout {
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let layout: SheetLayout = serde_json::from_str(&raw)?;
        tracing::info!(
            "Loaded sheet layout from {} ({} age blocks, {} race blocks)",
            path.display(),
            layout.age_blocks.len(),
            layout.race_blocks.len()
        );
        Ok(layout)
    }
}

/// Builds the age and race wide tables using the default layout.
pub fn convert_raw_to_matrix(
    grid: &RawGrid,
    years: &YearSequence,
    od_cause: &str,
) -> Result<(WideTable, WideTable), AppError> {
    convert_with_layout(grid, years, od_cause, &SheetLayout::default())
}

pub fn convert_with_layout(
    grid: &RawGrid,
    years: &YearSequence,
    od_cause: &str,
    layout: &SheetLayout,
) -> Result<(WideTable, WideTable), AppError> {
    let age = assemble(grid, years, od_cause, &layout.age_blocks)?;
    let race = assemble(grid, years, od_cause, &layout.race_blocks)?;
    tracing::info!(
        "Assembled {} age rows and {} race rows for {}",
        age.len(),
        race.len(),
        od_cause
    );
    Ok((age, race))
}

fn assemble(
    grid: &RawGrid,
    years: &YearSequence,
    od_cause: &str,
    blocks: &[BlockSpec],
) -> Result<WideTable, AppError> {
    let (first, rest) = blocks
        .split_first()
        .ok_or_else(|| AppError::InvalidInput("Layout has no blocks to extract".to_string()))?;

    let mut table = first.extract(grid, years)?;
    for block in rest {
        table.append(block.extract(grid, years)?)?;
    }
    table.set_cause(od_cause);
    Ok(table)
}
