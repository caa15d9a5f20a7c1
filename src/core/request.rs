//! Caller-facing entry point: validates a request, resolves the index
//! rates once, then runs the simulator.
use super::error::SimulationError;
use super::rates::RateProvider;
use super::simulation::{self, LedgerEntry, LedgerSummary, SimulationInput};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Untrusted input, as received from a form, CLI or JSON payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    #[serde(default)]
    pub initial_balance: f64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub include_bonus: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub index: String,
    pub input: SimulationInput,
}

/// A completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub index: String,
    pub input: SimulationInput,
    pub ledger: Vec<LedgerEntry>,
    pub summary: LedgerSummary,
}

impl SimulationRequest {
    /// Checks required fields, the balance and the date range.
    ///
    /// All missing fields are reported together. A blank index counts as
    /// missing.
    pub fn validate(self) -> Result<ValidatedRequest, SimulationError> {
        let index = self
            .index
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty());

        let mut missing = Vec::new();
        if self.start_date.is_none() {
            missing.push("start_date");
        }
        if self.end_date.is_none() {
            missing.push("end_date");
        }
        if index.is_none() {
            missing.push("index");
        }

        let (Some(start_date), Some(end_date), Some(index)) = (self.start_date, self.end_date, index)
        else {
            return Err(SimulationError::MissingField(missing));
        };

        simulation::check_initial_balance(self.initial_balance)?;
        if start_date >= end_date {
            return Err(SimulationError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }

        Ok(ValidatedRequest {
            index,
            input: SimulationInput {
                initial_balance: self.initial_balance,
                start_date,
                end_date,
                include_bonus: self.include_bonus,
            },
        })
    }
}

/// Validates `request`, loads the whole rate table for its index from
/// `provider` and simulates.
///
/// Nothing is fetched when validation fails. A provider failure or an empty
/// table is reported as [`SimulationError::RateSource`] instead of running
/// on zero rates.
pub async fn run_simulation(
    request: SimulationRequest,
    provider: &dyn RateProvider,
) -> Result<Simulation, SimulationError> {
    let ValidatedRequest { index, input } = request.validate()?;
    info!(
        %index,
        start = %input.start_date,
        end = %input.end_date,
        include_bonus = input.include_bonus,
        "Running simulation"
    );

    let rates = provider.fetch_rates(&index).await.map_err(|e| {
        warn!(%index, error = %e, "Rate provider failed");
        SimulationError::RateSource {
            index: index.clone(),
            reason: format!("{e:#}"),
        }
    })?;
    if rates.is_empty() {
        return Err(SimulationError::RateSource {
            index,
            reason: "no rates available".to_string(),
        });
    }
    debug!(%index, count = rates.len(), "Loaded rates");

    let ledger = simulation::simulate(&input, &rates)?;
    let summary = LedgerSummary::from_ledger(input.initial_balance, &ledger)?;

    Ok(Simulation {
        index,
        input,
        ledger,
        summary,
    })
}
