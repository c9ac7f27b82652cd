use polars::prelude::*;

use super::FLAG_COL;
use crate::error::AppError;

/// Keeps only rows with no reliability flag, in their original order.
pub fn filter_reliable_estimates(df: &DataFrame) -> Result<DataFrame, AppError> {
    let reliable = df
        .clone()
        .lazy()
        .filter(col(FLAG_COL).is_null())
        .collect()?;

    tracing::debug!(
        "Dropped {} flagged estimates, kept {}",
        df.height() - reliable.height(),
        reliable.height()
    );
    Ok(reliable)
}
