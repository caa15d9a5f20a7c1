use crate::core::config::AppConfig;
use crate::core::rates::{RateProvider, RateRecord, RateTable};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Serves index tables stored as YAML or JSON lists of
/// `{year, month, value}` rows (`ano`, `mes`, `valor` also accepted).
pub struct FileRateProvider {
    files: BTreeMap<String, PathBuf>,
}

impl FileRateProvider {
    pub fn new(files: impl IntoIterator<Item = (String, PathBuf)>) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(name, path)| (name.trim().to_lowercase(), path))
                .collect(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config
                .indexes
                .iter()
                .map(|index| (index.name.clone(), config.resolve_path(index))),
        )
    }

    /// Configured index names, sorted.
    pub fn indexes(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn parse_rate_file(path: &Path, contents: &str) -> Result<Vec<RateRecord>> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(contents)
                .with_context(|| format!("Failed to parse YAML rate file: {}", path.display())),
            Some("json") => serde_json::from_str(contents)
                .with_context(|| format!("Failed to parse JSON rate file: {}", path.display())),
            _ => Err(anyhow!(
                "Unsupported rate file format (expected .yaml, .yml or .json): {}",
                path.display()
            )),
        }
    }
}

#[async_trait]
impl RateProvider for FileRateProvider {
    async fn fetch_rates(&self, index: &str) -> Result<RateTable> {
        let path = self
            .files
            .get(&index.trim().to_lowercase())
            .ok_or_else(|| anyhow!("No rate file configured for index: {}", index))?;
        debug!("Reading rates for {} from {}", index, path.display());

        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read rate file: {}", path.display()))?;

        let records = match Self::parse_rate_file(path, &contents) {
            Ok(records) => records,
            Err(e) => {
                error!(error = ?e, %index, "Failed to parse rate file");
                return Err(e);
            }
        };

        let table = RateTable::from_records(records)
            .with_context(|| format!("Invalid rate data in {}", path.display()))?;
        debug!("Loaded {} rates for {}", table.len(), index);
        Ok(table)
    }
}
