use crate::error::AppError;
use crate::services::excel::{convert_with_layout, extract_years_at, RawGrid, SheetLayout};
use crate::services::reshaper::{convert_matrix_to_tables, LongTable};

/// Grid to tidy tables in one call: years, blocks, then unpivot.
pub fn extract_sheet(
    grid: &RawGrid,
    od_cause: &str,
    layout: &SheetLayout,
) -> Result<(LongTable, LongTable), AppError> {
    let years = extract_years_at(grid, layout.year_row, layout.year_cols.clone())?;
    let (age, race) = convert_with_layout(grid, &years, od_cause, layout)?;
    let (age_table, race_table) = convert_matrix_to_tables(&age, &race);

    tracing::info!(
        "{}: {} age records ({} missing), {} race records ({} missing)",
        od_cause,
        age_table.len(),
        age_table.missing_rate_count(),
        race_table.len(),
        race_table.missing_rate_count()
    );
    Ok((age_table, race_table))
}
