use super::ui;
use crate::core::config::AppConfig;
use crate::core::month::MONTH_ABBREVIATIONS;
use crate::core::{RateLookup, RateProvider, RateTable};
use anyhow::{Context, Result, anyhow};
use comfy_table::Cell;
use tracing::info;

pub async fn run(
    config: &AppConfig,
    provider: &(dyn RateProvider + Send + Sync),
    index: Option<String>,
) -> Result<()> {
    let index = index
        .or_else(|| config.default_index.clone())
        .ok_or_else(|| anyhow!("No index given and no default_index configured"))?;
    info!("Loading rates for {}", index);

    let table = provider
        .fetch_rates(&index)
        .await
        .with_context(|| format!("Failed to load rates for index: {index}"))?;

    if table.is_empty() {
        println!("No rates found for {index}.");
        return Ok(());
    }

    println!(
        "Index: {}\n\n{}",
        ui::style_text(&config.index_title(&index), ui::StyleType::Title),
        display_rate_grid(&table)
    );
    Ok(())
}

/// Compounded percentage over the known months of `year`.
fn accumulated_rate(table: &RateTable, year: i32) -> Option<f64> {
    let rates: Vec<f64> = (0..12).filter_map(|m| table.rate(year, m)).collect();
    if rates.is_empty() {
        return None;
    }
    let factor: f64 = rates.iter().map(|r| 1.0 + r / 100.0).product();
    Some((factor - 1.0) * 100.0)
}

fn display_rate_grid(table: &RateTable) -> String {
    let mut grid = ui::new_styled_table();

    let mut header = vec![ui::header_cell("Year")];
    header.extend(MONTH_ABBREVIATIONS.iter().map(|m| ui::header_cell(m)));
    header.push(ui::header_cell("Year (%)"));
    grid.set_header(header);

    for year in table.years() {
        let mut row = vec![Cell::new(year)];
        for month in 0..12 {
            row.push(match table.rate(year, month) {
                Some(rate) => Cell::new(format!("{rate}")),
                None => ui::na_cell(false),
            });
        }
        row.push(match accumulated_rate(table, year) {
            Some(acc) => ui::change_cell(acc),
            None => ui::na_cell(false),
        });
        grid.add_row(row);
    }

    grid.to_string()
}
