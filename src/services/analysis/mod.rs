//! Helpers over the published estimates dataset, one row per
//! (panel, demographic label, year) with an optional reliability flag.

pub mod labels;
pub mod rate_change;
pub mod reliability;
pub mod trend;

use polars::prelude::*;
use std::path::Path;

use crate::error::AppError;

pub use labels::{add_demographic_columns, parse_demographic_label, DemographicLabel, Sex};
pub use rate_change::compute_rate_change;
pub use reliability::filter_reliable_estimates;
pub use trend::{fit_ols, fit_trend_model, TrendFit, DEFAULT_DEMOGRAPHIC, DEFAULT_PANEL};

pub const YEAR_COL: &str = "YEAR";
pub const ESTIMATE_COL: &str = "ESTIMATE";
pub const FLAG_COL: &str = "FLAG";
pub const PANEL_COL: &str = "PANEL";
pub const STUB_LABEL_COL: &str = "STUB_LABEL";

pub fn load_estimates_csv(path: &Path) -> Result<DataFrame, AppError> {
    tracing::info!("Reading estimates from {}", path.display());
    let df = CsvReader::from_path(path)?
        .has_header(true)
        .finish()?;
    tracing::info!("Read {} estimate rows", df.height());
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_estimates_with_empty_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "PANEL,STUB_LABEL,YEAR,ESTIMATE,FLAG").unwrap();
        writeln!(file, "All drug overdose deaths,All persons,1999,6.1,").unwrap();
        writeln!(file, "All drug overdose deaths,Male,1999,,*").unwrap();
        file.flush().unwrap();

        let df = load_estimates_csv(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.column(FLAG_COL).unwrap().null_count(), 1);
        assert_eq!(filter_reliable_estimates(&df).unwrap().height(), 1);
    }
}
