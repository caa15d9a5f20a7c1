//! Month-by-month balance correction by a percentage index.
use super::error::SimulationError;
use super::month;
use super::rates::RateLookup;
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy, prelude::*};
use serde::Serialize;
use tracing::debug;

/// The bonus is paid while the counter is above this value.
const BONUS_TRIGGER: u32 = 12;
/// The counter restarts from zero once it goes above this value.
const BONUS_RESET: u32 = 13;

/// Largest initial balance magnitude accepted. `Decimal` tops out near 7.9e28,
/// so anything larger could never be emitted.
pub const MAX_INITIAL_BALANCE: f64 = 1e28;

/// Validated inputs for a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationInput {
    pub initial_balance: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub include_bonus: bool,
}

/// One simulated month. Monetary amounts are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub period_label: String,
    pub year: i32,
    /// 1-based calendar month
    pub month: u32,
    pub rate_applied: f64,
    pub opening_balance: Decimal,
    pub accrual_amount: Decimal,
    pub bonus_amount: Decimal,
    pub balance_after: Decimal,
}

/// Totals over a ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub periods: usize,
    pub total_accrual: Decimal,
    pub total_bonus: Decimal,
    pub final_balance: Decimal,
}

impl LedgerSummary {
    pub fn from_ledger(
        initial_balance: f64,
        entries: &[LedgerEntry],
    ) -> Result<Self, SimulationError> {
        let final_balance = match entries.last() {
            Some(entry) => entry.balance_after,
            None => round2(initial_balance)?,
        };

        Ok(Self {
            periods: entries.len(),
            total_accrual: entries.iter().map(|e| e.accrual_amount).sum(),
            total_bonus: entries.iter().map(|e| e.bonus_amount).sum(),
            final_balance,
        })
    }
}

/// Rounds to two decimal places, halves away from zero.
pub fn round2(value: f64) -> Result<Decimal, SimulationError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| SimulationError::Computation(format!("Value out of range: {value}")))
}

/// Rejects initial balances that are non-finite or too large to emit.
pub fn check_initial_balance(value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() || value.abs() > MAX_INITIAL_BALANCE {
        return Err(SimulationError::InvalidBalance(value));
    }
    Ok(())
}

/// Formats the period label, e.g. "Fev/2023".
pub fn period_label(date: NaiveDate) -> String {
    let name = month::abbreviation(date.month0()).unwrap_or("???");
    format!("{}/{}", name, date.year())
}

/// Runs the simulation from `start_date` to `end_date`, inclusive.
///
/// Each period applies the month's rate to the running balance, then adds
/// the bonus (a third of the balance) when enabled and the bonus counter is
/// above 12. The counter goes up by one every period and restarts at zero
/// after passing 13, so the first bonus lands on the 14th period and recurs
/// every 14 periods after that.
///
/// The cursor for period `k` is `start_date + k months`. Days past the end of
/// a shorter month clamp to its last day, without carrying the clamp into
/// later months. The loop stops at the first cursor after `end_date`.
///
/// The running balance is kept at full precision; only emitted values are
/// rounded. Any failure discards the whole ledger.
pub fn simulate(
    input: &SimulationInput,
    rates: &dyn RateLookup,
) -> Result<Vec<LedgerEntry>, SimulationError> {
    if input.start_date >= input.end_date {
        return Err(SimulationError::InvalidRange {
            start: input.start_date,
            end: input.end_date,
        });
    }
    check_initial_balance(input.initial_balance)?;

    let mut balance = input.initial_balance;
    let mut bonus_counter: u32 = 0;
    let mut entries = Vec::new();

    for step in 0u32.. {
        let cursor = input
            .start_date
            .checked_add_months(Months::new(step))
            .ok_or_else(|| {
                SimulationError::Computation(format!(
                    "Date overflow {step} months after {}",
                    input.start_date
                ))
            })?;
        if cursor > input.end_date {
            break;
        }

        let year = cursor.year();
        let month_index = cursor.month0();
        let rate = rates.rate(year, month_index).unwrap_or(0.0);

        let opening = balance;
        let accrual = balance * (rate / 100.0);
        balance += accrual;

        let bonus = if input.include_bonus && bonus_counter > BONUS_TRIGGER {
            balance / 3.0
        } else {
            0.0
        };
        balance += bonus;

        bonus_counter += 1;
        if bonus_counter > BONUS_RESET {
            bonus_counter = 0;
        }

        let label = period_label(cursor);
        if !balance.is_finite() {
            return Err(SimulationError::Computation(format!(
                "Balance is no longer finite at {label}"
            )));
        }

        debug!(period = %label, rate, accrual, bonus, balance, "Period simulated");

        entries.push(LedgerEntry {
            period_label: label,
            year,
            month: month_index + 1,
            rate_applied: rate,
            opening_balance: round2(opening)?,
            accrual_amount: round2(accrual)?,
            bonus_amount: round2(bonus)?,
            balance_after: round2(balance)?,
        });
    }

    Ok(entries)
}
