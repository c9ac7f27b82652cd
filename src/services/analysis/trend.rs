use polars::prelude::*;
use serde::Serialize;

use super::{ESTIMATE_COL, PANEL_COL, STUB_LABEL_COL, YEAR_COL};
use crate::error::AppError;

pub const DEFAULT_PANEL: &str = "All drug overdose deaths";
pub const DEFAULT_DEMOGRAPHIC: &str = "All persons";

/// Ordinary least squares fit of rate on year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub predictions: Vec<f64>,
    pub years: Vec<f64>,
}

/// Fits a linear trend to one panel and demographic, ordered by year.
///
/// Rows missing a year or an estimate are skipped.
pub fn fit_trend_model(
    df: &DataFrame,
    panel: &str,
    demographic: &str,
) -> Result<TrendFit, AppError> {
    let subset = df
        .clone()
        .lazy()
        .filter(
            col(PANEL_COL)
                .eq(lit(panel))
                .and(col(STUB_LABEL_COL).eq(lit(demographic))),
        )
        .select([
            col(YEAR_COL).cast(DataType::Float64),
            col(ESTIMATE_COL).cast(DataType::Float64),
        ])
        .collect()?;

    let years = subset.column(YEAR_COL)?.f64()?;
    let estimates = subset.column(ESTIMATE_COL)?.f64()?;

    let mut points: Vec<(f64, f64)> = years
        .into_iter()
        .zip(estimates)
        .filter_map(|(year, estimate)| Some((year?, estimate?)))
        .collect();
    if points.len() < subset.height() {
        tracing::debug!(
            "Skipped {} rows without a year or estimate for {} / {}",
            subset.height() - points.len(),
            panel,
            demographic
        );
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (xs, ys): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
    let fit = fit_ols(&xs, &ys)?;
    tracing::debug!(
        "Trend for {} / {}: slope {:.4}, r² {:.4}",
        panel,
        demographic,
        fit.slope,
        fit.r_squared
    );
    Ok(fit)
}

/// Single-variable least squares. Needs at least two distinct `years`.
pub fn fit_ols(years: &[f64], values: &[f64]) -> Result<TrendFit, AppError> {
    if years.len() != values.len() {
        return Err(AppError::InvalidInput(format!(
            "{} years but {} values",
            years.len(),
            values.len()
        )));
    }

    let n = years.len() as f64;
    let mean_x = years.iter().sum::<f64>() / n;
    let mean_y = values.iter().sum::<f64>() / n;

    let sxx: f64 = years.iter().map(|x| (x - mean_x).powi(2)).sum();
    if years.is_empty() || sxx == 0.0 {
        return Err(AppError::InsufficientData(format!(
            "A trend needs at least two distinct years, got {} points",
            years.len()
        )));
    }
    let sxy: f64 = years
        .iter()
        .zip(values)
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let predictions: Vec<f64> = years.iter().map(|x| intercept + slope * x).collect();

    let ss_res: f64 = values
        .iter()
        .zip(&predictions)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    let ss_tot: f64 = values.iter().map(|y| (y - mean_y).powi(2)).sum();
    // Constant response: perfect fit scores 1, anything else 0.
    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(TrendFit {
        slope,
        intercept,
        r_squared,
        predictions,
        years: years.to_vec(),
    })
}
