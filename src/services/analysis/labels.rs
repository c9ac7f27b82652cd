use polars::prelude::*;

use super::STUB_LABEL_COL;
use crate::error::AppError;

pub const ALL_PERSONS: &str = "All persons";
const LABEL_DELIMITER: &str = ": ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
    All,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
            Sex::All => "All",
        }
    }

    /// Only the leading label token can name a sex, and only as Male or Female.
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "Male" => Some(Sex::Male),
            "Female" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// A stub label split into its sex, age and race/ethnicity parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemographicLabel {
    pub sex: Option<Sex>,
    pub age_group: Option<String>,
    pub race_ethnicity: Option<String>,
}

/// Best-effort decomposition of labels such as `"Male: Not Hispanic or Latino: White"`.
///
/// Any token mentioning "years" is the age group; every other token after the
/// optional sex is part of the race/ethnicity, re-joined with `": "`.
pub fn parse_demographic_label(stub_label: &str) -> DemographicLabel {
    if stub_label == ALL_PERSONS {
        return DemographicLabel {
            sex: Some(Sex::All),
            ..Default::default()
        };
    }

    let mut label = DemographicLabel::default();
    let mut parts = stub_label.split(LABEL_DELIMITER).peekable();

    if let Some(sex) = parts.peek().and_then(|first| Sex::from_token(first)) {
        label.sex = Some(sex);
        parts.next();
    }

    for part in parts {
        if part.contains("years") {
            label.age_group = Some(part.to_string());
        } else {
            match label.race_ethnicity.as_mut() {
                Some(race) => {
                    race.push_str(LABEL_DELIMITER);
                    race.push_str(part);
                }
                None => label.race_ethnicity = Some(part.to_string()),
            }
        }
    }

    label
}

/// Appends `sex`, `age_group` and `race_ethnicity` columns parsed from `STUB_LABEL`.
pub fn add_demographic_columns(df: &DataFrame) -> Result<DataFrame, AppError> {
    let parsed: Vec<Option<DemographicLabel>> = df
        .column(STUB_LABEL_COL)?
        .str()?
        .into_iter()
        .map(|label| label.map(parse_demographic_label))
        .collect();

    let sex: Vec<Option<&str>> = parsed
        .iter()
        .map(|p| p.as_ref().and_then(|l| l.sex).map(|s| s.as_str()))
        .collect();
    let age: Vec<Option<&str>> = parsed
        .iter()
        .map(|p| p.as_ref().and_then(|l| l.age_group.as_deref()))
        .collect();
    let race: Vec<Option<&str>> = parsed
        .iter()
        .map(|p| p.as_ref().and_then(|l| l.race_ethnicity.as_deref()))
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new("sex", sex))?;
    out.with_column(Series::new("age_group", age))?;
    out.with_column(Series::new("race_ethnicity", race))?;
    Ok(out)
}
