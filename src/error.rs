use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("File processing error: {0}")]
    FileProcessingError(String),

    #[error("DataFrame error: {0}")]
    DataFrameError(String),

    #[error("Cell ({row}, {col}) is outside the {height}x{width} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("Block has {columns} value columns but {years} years were extracted")]
    YearMismatch { columns: usize, years: usize },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

impl From<PolarsError> for AppError {
    fn from(err: PolarsError) -> Self {
        AppError::DataFrameError(err.to_string())
    }
}

impl From<calamine::Error> for AppError {
    fn from(err: calamine::Error) -> Self {
        AppError::FileProcessingError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}
