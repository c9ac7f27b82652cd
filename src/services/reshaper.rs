use polars::prelude::*;

use crate::error::AppError;
use crate::services::excel::types::WideTable;
use crate::services::excel::utils::coerce_year;

pub const CAUSE_COLUMN: &str = "od_cause";
pub const YEAR_COLUMN: &str = "year";
pub const RATE_COLUMN: &str = "rate";

/// One (group, year) observation. A `None` rate means unknown, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub cause: Option<String>,
    pub attribute: String,
    pub group: String,
    pub year: Option<i32>,
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    pub attr_column: String,
    pub group_column: String,
    pub records: Vec<LongRecord>,
}

impl LongTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn missing_rate_count(&self) -> usize {
        self.records.iter().filter(|r| r.rate.is_none()).count()
    }

    pub fn append(&mut self, other: LongTable) -> Result<(), AppError> {
        if other.attr_column != self.attr_column || other.group_column != self.group_column {
            return Err(AppError::InvalidInput(format!(
                "Cannot append {} table to {} table",
                other.group_column, self.group_column
            )));
        }
        self.records.extend(other.records);
        Ok(())
    }

    pub fn to_dataframe(&self) -> Result<DataFrame, AppError> {
        let causes: Vec<Option<&str>> = self.records.iter().map(|r| r.cause.as_deref()).collect();
        let attributes: Vec<&str> = self.records.iter().map(|r| r.attribute.as_str()).collect();
        let groups: Vec<&str> = self.records.iter().map(|r| r.group.as_str()).collect();
        let years: Vec<Option<i32>> = self.records.iter().map(|r| r.year).collect();
        let rates: Vec<Option<f64>> = self.records.iter().map(|r| r.rate).collect();

        DataFrame::new(vec![
            Series::new(CAUSE_COLUMN, causes),
            Series::new(&self.attr_column, attributes),
            Series::new(&self.group_column, groups),
            Series::new(YEAR_COLUMN, years),
            Series::new(RATE_COLUMN, rates),
        ])
        .map_err(|e| AppError::DataFrameError(format!("Failed to create DataFrame: {}", e)))
    }
}

/// Unpivots a wide table, year-major: every row for the first year, then the next.
pub fn melt(wide: &WideTable) -> LongTable {
    let mut records = Vec::with_capacity(wide.len() * wide.years.len());

    for (idx, label) in wide.years.labels().iter().enumerate() {
        let year = coerce_year(label.to_number());
        for row in &wide.records {
            let rate = row.values.get(idx).and_then(|cell| cell.to_number());
            records.push(LongRecord {
                cause: row.cause.clone(),
                attribute: row.attribute.clone(),
                group: row.group.clone(),
                year,
                rate,
            });
        }
    }

    let table = LongTable {
        attr_column: wide.attr_column.clone(),
        group_column: wide.group_column.clone(),
        records,
    };
    tracing::debug!(
        "Melted {} {} rows into {} records ({} without a rate)",
        wide.len(),
        wide.group_column,
        table.len(),
        table.missing_rate_count()
    );
    table
}

/// Turns the age and race wide tables into tidy tables.
pub fn convert_matrix_to_tables(age: &WideTable, race: &WideTable) -> (LongTable, LongTable) {
    (melt(age), melt(race))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::excel::types::{CellValue, WideRecord, YearSequence};

    fn wide() -> WideTable {
        WideTable {
            attr_column: "sex".into(),
            group_column: "age_group".into(),
            years: YearSequence::new(vec![
                CellValue::Number(1999.0),
                CellValue::Text("2000".into()),
                CellValue::Text("2001 (preliminary)".into()),
            ]),
            records: vec![
                WideRecord {
                    cause: Some("Any opioid".into()),
                    attribute: "Male".into(),
                    group: "15-24 years".into(),
                    values: vec![
                        CellValue::Number(1.0),
                        CellValue::Suppressed,
                        CellValue::Text("3.5".into()),
                    ],
                },
                WideRecord {
                    cause: Some("Any opioid".into()),
                    attribute: "Male".into(),
                    group: "25-34 years".into(),
                    values: vec![
                        CellValue::Number(4.0),
                        CellValue::Number(5.0),
                        CellValue::Text("--".into()),
                    ],
                },
            ],
        }
    }

    #[test]
    fn row_count_is_rows_times_years() {
        let table = melt(&wide());
        assert_eq!(table.len(), 2 * 3);
    }

    #[test]
    fn output_is_year_major() {
        let table = melt(&wide());
        let keys: Vec<(Option<i32>, &str)> = table
            .records
            .iter()
            .map(|r| (r.year, r.group.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Some(1999), "15-24 years"),
                (Some(1999), "25-34 years"),
                (Some(2000), "15-24 years"),
                (Some(2000), "25-34 years"),
                (None, "15-24 years"),
                (None, "25-34 years"),
            ]
        );
    }

    #[test]
    fn every_wide_cell_appears_once() {
        let source = wide();
        let table = melt(&source);
        for (year_idx, label) in source.years.labels().iter().enumerate() {
            let year = coerce_year(label.to_number());
            for row in &source.records {
                let matches: Vec<&LongRecord> = table
                    .records
                    .iter()
                    .filter(|r| r.group == row.group && r.year == year)
                    .collect();
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].rate, row.values[year_idx].to_number());
            }
        }
    }

    #[test]
    fn suppressed_and_unparseable_rates_are_missing() {
        let table = melt(&wide());
        assert_eq!(table.records[2].rate, None);
        assert_eq!(table.records[4].rate, Some(3.5));
        assert_eq!(table.records[5].rate, None);
        assert_eq!(table.missing_rate_count(), 2);
    }

    #[test]
    fn converts_both_tables() {
        let age = wide();
        let mut race = wide();
        race.group_column = "race".into();
        race.records.truncate(1);

        let (age_long, race_long) = convert_matrix_to_tables(&age, &race);
        assert_eq!(age_long.len(), 6);
        assert_eq!(race_long.len(), 3);
        assert_eq!(race_long.group_column, "race");
    }

    #[test]
    fn dataframe_has_tidy_columns() {
        let df = melt(&wide()).to_dataframe().unwrap();
        assert_eq!(
            df.get_column_names(),
            vec!["od_cause", "sex", "age_group", "year", "rate"]
        );
        assert_eq!(df.height(), 6);
        assert_eq!(df.column("rate").unwrap().null_count(), 2);
        assert_eq!(df.column("year").unwrap().null_count(), 2);
    }

    #[test]
    fn append_requires_matching_shape() {
        let mut age = melt(&wide());
        let mut other = wide();
        other.group_column = "race".into();
        assert!(age.append(melt(&other)).is_err());
        assert!(age.append(melt(&wide())).is_ok());
        assert_eq!(age.len(), 12);
    }
}
