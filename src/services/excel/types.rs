use calamine::Data;
use std::ops::Range;

use crate::error::AppError;

/// Placeholder the source tables use for suppressed or unreliable estimates.
pub const SUPPRESSED_MARKER: &str = "\u{2026}";

/// A single untyped spreadsheet cell.
///
/// Suppressed estimates are recognized once, when the cell is read, so nothing
/// downstream has to compare against the ellipsis glyph.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Suppressed,
}

impl CellValue {
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else if trimmed == SUPPRESSED_MARKER {
            CellValue::Suppressed
        } else {
            CellValue::Text(raw.to_string())
        }
    }

    /// Renders the cell as label text. Whole numbers print without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Suppressed => SUPPRESSED_MARKER.to_string(),
        }
    }

    /// Lenient numeric coercion: anything that is not a finite number becomes `None`.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Empty | CellValue::Suppressed => None,
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::DateTime(d) => CellValue::Number(d.as_f64()),
            Data::String(s) => CellValue::from_text(s),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Rectangular, read-only view of one worksheet, indexed from (0, 0).
#[derive(Debug, Clone, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl RawGrid {
    pub fn new(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in rows.iter_mut() {
            row.resize(width, CellValue::Empty);
        }
        Self { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&CellValue, AppError> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or_else(|| self.out_of_bounds(row, col))
    }

    /// Cells of `row` over the half-open column window `cols`.
    pub fn row_slice(&self, row: usize, cols: Range<usize>) -> Result<&[CellValue], AppError> {
        let cells = self.rows.get(row).ok_or_else(|| self.out_of_bounds(row, cols.start))?;
        if cols.start > cols.end || cols.end > self.width {
            return Err(self.out_of_bounds(row, cols.end.saturating_sub(1).max(cols.start)));
        }
        Ok(&cells[cols])
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> AppError {
        AppError::OutOfBounds {
            row,
            col,
            height: self.height(),
            width: self.width,
        }
    }
}

/// Year labels read from the header row, one per value column.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSequence(Vec<CellValue>);

impl YearSequence {
    pub fn new(labels: Vec<CellValue>) -> Self {
        Self(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> &[CellValue] {
        &self.0
    }
}

/// One row of a wide table: identifying attributes plus one cell per year.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRecord {
    pub cause: Option<String>,
    pub attribute: String,
    pub group: String,
    pub values: Vec<CellValue>,
}

/// Wide table: one row per group, one value column per year.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub attr_column: String,
    pub group_column: String,
    pub years: YearSequence,
    pub records: Vec<WideRecord>,
}

impl WideTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends the rows of `other`, which must have the same columns.
    pub fn append(&mut self, other: WideTable) -> Result<(), AppError> {
        if other.attr_column != self.attr_column
            || other.group_column != self.group_column
            || other.years != self.years
        {
            return Err(AppError::InvalidInput(format!(
                "Cannot append table ({}, {}) to table ({}, {}) with different columns",
                other.attr_column, other.group_column, self.attr_column, self.group_column
            )));
        }
        self.records.extend(other.records);
        Ok(())
    }

    /// Tags every row with the overdose cause.
    pub fn set_cause(&mut self, cause: &str) {
        for record in self.records.iter_mut() {
            record.cause = Some(cause.to_string());
        }
    }
}
