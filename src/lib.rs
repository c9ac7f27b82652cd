//! Extracts drug-overdose mortality tables from report spreadsheets and
//! reshapes them into tidy (one row per group and year) tables.

pub mod config;
pub mod error;
pub mod logging;
pub mod services;

pub use error::AppError;
