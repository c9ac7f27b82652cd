use anyhow::{Context, Result};

use overdose_tables::config::Config;
use overdose_tables::logging;
use overdose_tables::services::analysis::{
    compute_rate_change, filter_reliable_estimates, fit_trend_model, load_estimates_csv,
    DEFAULT_DEMOGRAPHIC, DEFAULT_PANEL, STUB_LABEL_COL,
};
use overdose_tables::services::excel::{read_excel_file_sheet, SheetLayout};
use overdose_tables::services::pipeline::extract_sheet;
use overdose_tables::services::reshaper::LongTable;
use overdose_tables::services::writer::write_csv;

fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = Config::new()?;

    let layout = match &config.layout_path {
        Some(path) => SheetLayout::from_json_file(path)
            .with_context(|| format!("Failed to load layout {}", path.display()))?,
        None => SheetLayout::default(),
    };

    let mut age_table: Option<LongTable> = None;
    let mut race_table: Option<LongTable> = None;

    for source in &config.sheets {
        tracing::info!("Processing sheet {} ({})", source.sheet, source.cause);
        let grid = read_excel_file_sheet(&config.workbook_path, &source.sheet)
            .with_context(|| format!("Failed to read sheet {}", source.sheet))?;
        let (age, race) = extract_sheet(&grid, &source.cause, &layout)
            .with_context(|| format!("Failed to extract sheet {}", source.sheet))?;

        merge(&mut age_table, age)?;
        merge(&mut race_table, race)?;
    }

    for (name, table) in [("age_table.csv", &age_table), ("race_table.csv", &race_table)] {
        if let Some(table) = table {
            let mut df = table.to_dataframe()?;
            write_csv(&mut df, &config.output_dir.join(name))?;
        }
    }

    if let Some(path) = &config.estimates_path {
        let estimates = load_estimates_csv(path)
            .with_context(|| format!("Failed to read estimates {}", path.display()))?;
        let reliable = filter_reliable_estimates(&estimates)?;

        let mut change =
            compute_rate_change(&reliable, config.start_year, config.end_year, STUB_LABEL_COL)?;
        write_csv(&mut change, &config.output_dir.join("rate_change.csv"))?;

        match fit_trend_model(&reliable, DEFAULT_PANEL, DEFAULT_DEMOGRAPHIC) {
            Ok(fit) => {
                tracing::info!(
                    "{} / {}: slope {:.3} per year, intercept {:.3}, r² {:.3}",
                    DEFAULT_PANEL,
                    DEFAULT_DEMOGRAPHIC,
                    fit.slope,
                    fit.intercept,
                    fit.r_squared
                );
                let trend_path = config.output_dir.join("trend.json");
                std::fs::write(&trend_path, serde_json::to_string_pretty(&fit)?)
                    .with_context(|| format!("Failed to write {}", trend_path.display()))?;
            }
            Err(e) => tracing::warn!("Trend fit skipped: {}", e),
        }
    }

    tracing::info!("Done");
    Ok(())
}

fn merge(acc: &mut Option<LongTable>, table: LongTable) -> Result<()> {
    match acc {
        Some(existing) => existing.append(table)?,
        None => *acc = Some(table),
    }
    Ok(())
}
