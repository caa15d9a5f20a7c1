use crate::core::rates::{RateProvider, RateTable};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// In-process index tables, keyed by lower-cased index name.
#[derive(Debug, Clone, Default)]
pub struct MemoryRateProvider {
    tables: HashMap<String, RateTable>,
}

impl MemoryRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, index: &str, table: RateTable) -> Self {
        self.insert(index, table);
        self
    }

    pub fn insert(&mut self, index: &str, table: RateTable) {
        self.tables.insert(index.trim().to_lowercase(), table);
    }
}

#[async_trait]
impl RateProvider for MemoryRateProvider {
    async fn fetch_rates(&self, index: &str) -> Result<RateTable> {
        let table = self
            .tables
            .get(&index.trim().to_lowercase())
            .cloned()
            .ok_or_else(|| anyhow!("Unknown index: {}", index))?;
        debug!("Serving {} rates for {} from memory", table.len(), index);
        Ok(table)
    }
}
