//! Rate lookup abstractions and core types

use super::month;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Month column of a rate record: either a 1-based number or a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthKey {
    Number(u32),
    Name(String),
}

impl MonthKey {
    /// Resolves the key into a 0-based month index.
    pub fn to_index(&self) -> Result<u32> {
        match self {
            MonthKey::Number(n) => month::from_number(*n),
            MonthKey::Name(name) => match name.trim().parse::<u32>() {
                Ok(n) => month::from_number(n),
                Err(_) => month::parse_month_name(name),
            },
        }
    }
}

/// One row of an index table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(alias = "ano")]
    pub year: i32,
    #[serde(alias = "mes")]
    pub month: MonthKey,
    #[serde(alias = "valor")]
    pub value: f64,
}

/// Per-period percentage lookup consumed by the simulator.
pub trait RateLookup {
    /// Percentage rate for `year` and 0-based `month_index`, if known.
    fn rate(&self, year: i32, month_index: u32) -> Option<f64>;
}

/// All known rates of one index, keyed by (year, 0-based month).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<(i32, u32), f64>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from raw records. Later duplicates win.
    pub fn from_records(records: impl IntoIterator<Item = RateRecord>) -> Result<Self> {
        let mut table = Self::new();
        for record in records {
            let month_index = record.month.to_index()?;
            if !record.value.is_finite() {
                return Err(anyhow!(
                    "Non-finite rate for {}/{}: {}",
                    month_index + 1,
                    record.year,
                    record.value
                ));
            }
            table.insert(record.year, month_index, record.value);
        }
        Ok(table)
    }

    pub fn insert(&mut self, year: i32, month_index: u32, rate: f64) {
        self.rates.insert((year, month_index), rate);
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Distinct years present in the table, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rates.keys().map(|(year, _)| *year).collect();
        years.dedup();
        years
    }

    /// Iterates `(year, month_index, rate)` in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, u32, f64)> + '_ {
        self.rates
            .iter()
            .map(|((year, month), rate)| (*year, *month, *rate))
    }
}

impl RateLookup for RateTable {
    fn rate(&self, year: i32, month_index: u32) -> Option<f64> {
        self.rates.get(&(year, month_index)).copied()
    }
}

/// Source of whole index tables, resolved once per simulation run.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self, index: &str) -> Result<RateTable>;
}
