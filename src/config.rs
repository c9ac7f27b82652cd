use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use std::path::PathBuf;

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

const DEFAULT_START_YEAR: i32 = 1999;
const DEFAULT_END_YEAR: i32 = 2017;

/// One worksheet to extract and the overdose cause its rows describe.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSource {
    pub sheet: String,
    pub cause: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub workbook_path: PathBuf,
    pub sheets: Vec<SheetSource>,
    pub output_dir: PathBuf,
    pub layout_path: Option<PathBuf>,
    pub estimates_path: Option<PathBuf>,
    pub start_year: i32,
    pub end_year: i32,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let workbook_path = lookup("OVERDOSE_WORKBOOK")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("Failed to load OVERDOSE_WORKBOOK"))?;
        let sheets = lookup("OVERDOSE_SHEETS")
            .ok_or_else(|| anyhow!("Failed to load OVERDOSE_SHEETS"))
            .and_then(|raw| parse_sheet_list(&raw))?;

        Ok(Config {
            workbook_path,
            sheets,
            output_dir: lookup("OUTPUT_DIR").map(PathBuf::from).unwrap_or_else(default_output_dir),
            layout_path: lookup("SHEET_LAYOUT").map(PathBuf::from),
            estimates_path: lookup("ESTIMATES_CSV").map(PathBuf::from),
            start_year: parse_year(&lookup, "RATE_START_YEAR", DEFAULT_START_YEAR)?,
            end_year: parse_year(&lookup, "RATE_END_YEAR", DEFAULT_END_YEAR)?,
        })
    }
}

fn parse_year<F>(lookup: &F, key: &str, default: i32) -> Result<i32>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {} '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

/// Parses `sheet=cause` pairs separated by `;`.
pub fn parse_sheet_list(raw: &str) -> Result<Vec<SheetSource>> {
    let sheets = raw
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (sheet, cause) = entry
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected sheet=cause, got '{}'", entry))?;
            Ok(SheetSource {
                sheet: sheet.trim().to_string(),
                cause: cause.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if sheets.is_empty() {
        return Err(anyhow!("OVERDOSE_SHEETS names no sheets"));
    }
    Ok(sheets)
}
