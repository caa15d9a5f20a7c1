pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::providers::FileRateProvider;
use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info};

/// Inputs shared by the `simulate` and `compare` commands.
#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    pub initial_balance: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Falls back to `default_index` from the config when absent.
    pub index: Option<String>,
    /// `Some` overrides `include_bonus` from the config.
    pub include_bonus: Option<bool>,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Simulate(SimulateOptions),
    Compare(SimulateOptions),
    Rates { index: Option<String> },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Calculadora starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = FileRateProvider::from_config(&config);

    match command {
        AppCommand::Simulate(options) => cli::simulate::run(&config, &provider, options).await,
        AppCommand::Compare(options) => cli::compare::run(&config, &provider, options).await,
        AppCommand::Rates { index } => cli::rates::run(&config, &provider, index).await,
    }
}
