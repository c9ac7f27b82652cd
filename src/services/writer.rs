use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use crate::error::AppError;

pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).finish(df).map_err(|e| {
        AppError::FileProcessingError(format!("Failed to write {}: {}", path.display(), e))
    })?;
    tracing::info!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}
