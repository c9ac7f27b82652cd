use polars::prelude::*;

use super::{ESTIMATE_COL, YEAR_COL};
use crate::error::AppError;

pub const START_RATE: &str = "start_rate";
pub const END_RATE: &str = "end_rate";
pub const ABSOLUTE_CHANGE: &str = "absolute_change";
pub const PERCENT_CHANGE: &str = "percent_change";

/// Change in rate per group between `start_year` and `end_year`.
///
/// Groups present in only one of the two years are dropped. A zero start rate
/// gives an infinite percent change (NaN when the end rate is also zero).
pub fn compute_rate_change(
    df: &DataFrame,
    start_year: i32,
    end_year: i32,
    group_col: &str,
) -> Result<DataFrame, AppError> {
    let snapshot = |year: i32, alias: &str| {
        df.clone()
            .lazy()
            .filter(col(YEAR_COL).cast(DataType::Float64).eq(lit(year as f64)))
            .select([
                col(group_col),
                col(ESTIMATE_COL).cast(DataType::Float64).alias(alias),
            ])
            .collect()
    };

    let start = snapshot(start_year, START_RATE)?;
    let end = snapshot(end_year, END_RATE)?;

    let merged = start
        .clone()
        .lazy()
        .inner_join(end.clone().lazy(), col(group_col), col(group_col))
        .with_column((col(END_RATE) - col(START_RATE)).alias(ABSOLUTE_CHANGE))
        .with_column((col(ABSOLUTE_CHANGE) / col(START_RATE) * lit(100.0)).alias(PERCENT_CHANGE))
        .collect()?;

    let unmatched = (start.height() + end.height()).saturating_sub(2 * merged.height());
    if unmatched > 0 {
        tracing::debug!(
            "{} rows between {} and {} had no matching {}",
            unmatched,
            start_year,
            end_year,
            group_col
        );
    }

    let zero_starts = merged
        .column(START_RATE)?
        .f64()?
        .into_iter()
        .filter(|rate| *rate == Some(0.0))
        .count();
    if zero_starts > 0 {
        tracing::warn!(
            "{} groups have a zero rate in {}; their percent change is not finite",
            zero_starts,
            start_year
        );
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::STUB_LABEL_COL;

    fn value_for(df: &DataFrame, group: &str, column: &str) -> Option<f64> {
        let groups = df.column(STUB_LABEL_COL).unwrap().str().unwrap();
        let idx = groups.into_iter().position(|g| g == Some(group))?;
        df.column(column).unwrap().f64().unwrap().get(idx)
    }

    #[test]
    fn basic_change() {
        let df = df!(
            YEAR_COL => &[1999i64, 1999, 2017, 2017],
            STUB_LABEL_COL => &["A", "B", "A", "B"],
            ESTIMATE_COL => &[10.0, 20.0, 15.0, 30.0]
        )
        .unwrap();

        let result = compute_rate_change(&df, 1999, 2017, STUB_LABEL_COL).unwrap();

        assert_eq!(result.height(), 2);
        assert_eq!(value_for(&result, "A", START_RATE), Some(10.0));
        assert_eq!(value_for(&result, "A", END_RATE), Some(15.0));
        assert_eq!(value_for(&result, "A", ABSOLUTE_CHANGE), Some(5.0));
        assert_eq!(value_for(&result, "A", PERCENT_CHANGE), Some(50.0));
        assert_eq!(value_for(&result, "B", PERCENT_CHANGE), Some(50.0));
    }

    #[test]
    fn unmatched_groups_are_dropped() {
        let df = df!(
            YEAR_COL => &[1999i64, 1999, 2017],
            STUB_LABEL_COL => &["A", "C", "A"],
            ESTIMATE_COL => &[10.0, 5.0, 12.0]
        )
        .unwrap();

        let result = compute_rate_change(&df, 1999, 2017, STUB_LABEL_COL).unwrap();

        assert_eq!(result.height(), 1);
        assert_eq!(value_for(&result, "C", START_RATE), None);
    }

    #[test]
    fn fractional_years_do_not_match() {
        let df = df!(
            YEAR_COL => &[1999.5, 2017.0],
            STUB_LABEL_COL => &["A", "A"],
            ESTIMATE_COL => &[10.0, 15.0]
        )
        .unwrap();

        let result = compute_rate_change(&df, 1999, 2017, STUB_LABEL_COL).unwrap();

        assert_eq!(result.height(), 0);
    }

    #[test]
    fn null_groups_are_dropped() {
        let df = df!(
            YEAR_COL => &[1999i64, 1999, 2017, 2017],
            STUB_LABEL_COL => &[Some("A"), None, Some("A"), None],
            ESTIMATE_COL => &[10.0, 20.0, 15.0, 30.0]
        )
        .unwrap();

        let result = compute_rate_change(&df, 1999, 2017, STUB_LABEL_COL).unwrap();

        assert_eq!(result.height(), 1);
        assert_eq!(result.column(STUB_LABEL_COL).unwrap().null_count(), 0);
        assert_eq!(value_for(&result, "A", ABSOLUTE_CHANGE), Some(5.0));
    }

    #[test]
    fn zero_start_rate_is_infinite() {
        let df = df!(
            YEAR_COL => &[2000i64, 2010],
            STUB_LABEL_COL => &["A", "A"],
            ESTIMATE_COL => &[0.0, 3.0]
        )
        .unwrap();

        let result = compute_rate_change(&df, 2000, 2010, STUB_LABEL_COL).unwrap();

        let pct = value_for(&result, "A", PERCENT_CHANGE).unwrap();
        assert!(pct.is_infinite() && pct > 0.0);
    }
}
