use super::ui;
use crate::SimulateOptions;
use crate::core::config::AppConfig;
use crate::core::{RateProvider, Simulation, SimulationRequest, run_simulation};
use anyhow::{Context, Result};
use comfy_table::Cell;
use tracing::info;

/// Builds the request for `options`, filling the index and bonus flag
/// from the config when the options leave them unset.
pub fn build_request(config: &AppConfig, options: &SimulateOptions) -> SimulationRequest {
    SimulationRequest {
        initial_balance: options.initial_balance,
        start_date: options.start_date,
        end_date: options.end_date,
        index: options
            .index
            .clone()
            .or_else(|| config.default_index.clone()),
        include_bonus: options.include_bonus.unwrap_or(config.include_bonus),
    }
}

pub async fn run(
    config: &AppConfig,
    provider: &(dyn RateProvider + Send + Sync),
    options: SimulateOptions,
) -> Result<()> {
    let request = build_request(config, &options);
    info!("Simulating balance for index {:?}", request.index);
    let title = request
        .index
        .as_deref()
        .map(|index| config.index_title(index))
        .unwrap_or_default();

    let simulation = run_simulation(request, provider).await?;

    if options.json {
        let json = serde_json::to_string_pretty(&simulation)
            .context("Failed to serialize simulation")?;
        println!("{json}");
    } else {
        println!("{}", simulation.display_as_table(&title));
    }
    Ok(())
}

impl Simulation {
    /// Renders the ledger under `title`, which names the index.
    pub fn display_as_table(&self, title: &str) -> String {
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Period"),
            ui::header_cell("Opening"),
            ui::header_cell("Rate (%)"),
            ui::header_cell("Accrual"),
            ui::header_cell("Bonus"),
            ui::header_cell("Closing"),
        ]);

        for entry in &self.ledger {
            table.add_row(vec![
                Cell::new(&entry.period_label),
                ui::amount_cell(entry.opening_balance),
                ui::change_cell(entry.rate_applied),
                ui::amount_cell(entry.accrual_amount),
                ui::sparse_amount_cell(entry.bonus_amount),
                ui::amount_cell(entry.balance_after),
            ]);
        }

        let mut output = format!(
            "Index: {} ({} to {})\n\n",
            ui::style_text(title, ui::StyleType::Title),
            self.input.start_date,
            self.input.end_date
        );

        output.push_str(&table.to_string());

        output.push_str(&format!(
            "\n\nTotal accrual: {:.2}  Total bonus: {:.2}\n{}: {}",
            self.summary.total_accrual,
            self.summary.total_bonus,
            ui::style_text("Final balance", ui::StyleType::TotalLabel),
            ui::style_text(
                &format!("{:.2}", self.summary.final_balance),
                ui::StyleType::TotalValue
            )
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateTable;
    use crate::providers::MemoryRateProvider;
    use chrono::NaiveDate;

    fn options(index: Option<&str>) -> SimulateOptions {
        SimulateOptions {
            initial_balance: 1000.0,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2023, 2, 1),
            index: index.map(str::to_string),
            include_bonus: None,
            json: false,
        }
    }

    #[test]
    fn test_build_request_uses_config_defaults() {
        let config: AppConfig = serde_yaml::from_str(
            r#"
default_index: ipca
include_bonus: true
indexes: []
"#,
        )
        .unwrap();

        let request = build_request(&config, &options(None));
        assert_eq!(request.index.as_deref(), Some("ipca"));
        assert!(request.include_bonus);

        let request = build_request(&config, &options(Some("poupanca")));
        assert_eq!(request.index.as_deref(), Some("poupanca"));

        let mut without_bonus = options(None);
        without_bonus.include_bonus = Some(false);
        assert!(!build_request(&config, &without_bonus).include_bonus);

        let mut with_bonus = options(None);
        with_bonus.include_bonus = Some(true);
        assert!(build_request(&AppConfig::default(), &with_bonus).include_bonus);
        assert!(!build_request(&AppConfig::default(), &options(None)).include_bonus);
    }

    #[tokio::test]
    async fn test_display_as_table() {
        let mut table = RateTable::new();
        table.insert(2023, 0, 10.0);
        let provider = MemoryRateProvider::new().with_table("ipca", table);

        let request = build_request(&AppConfig::default(), &options(Some("ipca")));
        let simulation = run_simulation(request, &provider).await.unwrap();
        let output = simulation.display_as_table("ipca (Consumer prices)");

        assert!(output.contains("ipca (Consumer prices)"));
        assert!(output.contains("Jan/2023"));
        assert!(output.contains("Fev/2023"));
        assert!(output.contains("1100.00"));
        assert!(output.contains("10.00%"));
    }

    #[tokio::test]
    async fn test_run_without_index_fails() {
        let provider = MemoryRateProvider::new();
        let result = run(&AppConfig::default(), &provider, options(None)).await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Missing required field(s): index"));
    }
}
