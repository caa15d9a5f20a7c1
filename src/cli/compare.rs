use super::{simulate::build_request, ui};
use crate::SimulateOptions;
use crate::core::config::AppConfig;
use crate::core::{RateProvider, Simulation, SimulationError, run_simulation};
use crate::providers::FileRateProvider;
use anyhow::Result;
use comfy_table::{Attribute, Cell};
use futures::future::join_all;
use tracing::info;

/// Runs the same request against several indexes concurrently. Results keep
/// the order of `indexes`.
pub async fn compare_indexes(
    config: &AppConfig,
    provider: &(dyn RateProvider + Send + Sync),
    options: &SimulateOptions,
    indexes: &[String],
    on_done: &(dyn Fn() + Sync),
) -> Vec<(String, Result<Simulation, SimulationError>)> {
    let futures = indexes.iter().map(|index| {
        let mut request = build_request(config, options);
        request.index = Some(index.clone());
        async move {
            let result = run_simulation(request, provider).await;
            on_done();
            (index.clone(), result)
        }
    });

    join_all(futures).await
}

pub async fn run(
    config: &AppConfig,
    provider: &FileRateProvider,
    options: SimulateOptions,
) -> Result<()> {
    let indexes = provider.indexes();
    if indexes.is_empty() {
        println!("No indexes configured to compare.");
        return Ok(());
    }
    info!("Comparing {} indexes...", indexes.len());

    let pb = ui::new_progress_bar(indexes.len() as u64);
    pb.set_message("Simulating...");
    let results = compare_indexes(config, provider, &options, &indexes, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    println!("{}", display_comparison(&results));
    Ok(())
}

fn display_comparison(results: &[(String, Result<Simulation, SimulationError>)]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Index"),
        ui::header_cell("Periods"),
        ui::header_cell("Total Accrual"),
        ui::header_cell("Total Bonus"),
        ui::header_cell("Final Balance"),
    ]);

    let mut errors = Vec::new();
    for (index, result) in results {
        let name = Cell::new(index).add_attribute(Attribute::Bold);
        match result {
            Ok(simulation) => {
                let summary = &simulation.summary;
                table.add_row(vec![
                    name,
                    Cell::new(summary.periods),
                    ui::amount_cell(summary.total_accrual),
                    ui::sparse_amount_cell(summary.total_bonus),
                    ui::amount_cell(summary.final_balance),
                ]);
            }
            Err(e) => {
                table.add_row(vec![
                    name,
                    ui::na_cell(true),
                    ui::na_cell(true),
                    ui::na_cell(true),
                    ui::na_cell(true),
                ]);
                errors.push(format!("{index}: {e}"));
            }
        }
    }

    let mut output = table.to_string();
    for error in errors {
        output.push('\n');
        output.push_str(&ui::style_text(&error, ui::StyleType::Error));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateTable;
    use crate::providers::MemoryRateProvider;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn options() -> SimulateOptions {
        SimulateOptions {
            initial_balance: 100.0,
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2023, 2, 1),
            index: None,
            include_bonus: None,
            json: false,
        }
    }

    fn provider() -> MemoryRateProvider {
        let mut ipca = RateTable::new();
        ipca.insert(2023, 0, 1.0);
        ipca.insert(2023, 1, 1.0);
        let mut poupanca = RateTable::new();
        poupanca.insert(2023, 0, 0.5);
        MemoryRateProvider::new()
            .with_table("ipca", ipca)
            .with_table("poupanca", poupanca)
    }

    #[tokio::test]
    async fn test_compare_indexes_keeps_order_and_errors() {
        let provider = provider();
        let indexes = vec![
            "poupanca".to_string(),
            "selic".to_string(),
            "ipca".to_string(),
        ];
        let done = AtomicUsize::new(0);

        let results = compare_indexes(
            &AppConfig::default(),
            &provider,
            &options(),
            &indexes,
            &|| {
                done.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await;

        assert_eq!(done.load(Ordering::SeqCst), 3);
        let names: Vec<_> = results.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["poupanca", "selic", "ipca"]);

        let poupanca = results[0].1.as_ref().unwrap();
        assert_eq!(
            poupanca.summary.final_balance,
            Decimal::from_str("100.50").unwrap()
        );
        assert!(matches!(
            results[1].1,
            Err(SimulationError::RateSource { .. })
        ));
        let ipca = results[2].1.as_ref().unwrap();
        assert_eq!(
            ipca.summary.final_balance,
            Decimal::from_str("102.01").unwrap()
        );

        let output = display_comparison(&results);
        assert!(output.contains("102.01"));
        assert!(output.contains("selic: Failed to load rates"));
    }
}
