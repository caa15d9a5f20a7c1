use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::path::Path;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");

/// Sample rate tables written next to the config, as (relative path, contents).
const EXAMPLE_RATES: [(&str, &str); 2] = [
    ("rates/ipca.yaml", include_str!("../../docs/rates/ipca.yaml")),
    (
        "rates/poupanca.json",
        include_str!("../../docs/rates/poupanca.json"),
    ),
];

/// Creates a default configuration file with example content at the default location
pub fn setup() -> Result<()> {
    let path = AppConfig::default_config_path()?;
    setup_at_path(path)
}

/// Creates a default configuration file with example content at the specified path
pub fn setup_at_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    std::fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    for (relative, contents) in EXAMPLE_RATES {
        let rate_path = parent.join(relative);
        if rate_path.exists() {
            tracing::warn!("Keeping existing rate file at {}", rate_path.display());
            continue;
        }
        if let Some(dir) = rate_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        std::fs::write(&rate_path, contents)
            .with_context(|| format!("Failed to write rate file to {}", rate_path.display()))?;
    }

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateProvider;
    use crate::providers::FileRateProvider;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_setup_creates_config_and_rate_files() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("cidadao").join("config.yaml");

        setup_at_path(&config_path)?;

        assert!(config_path.exists());
        let content = fs::read_to_string(&config_path)?;
        assert!(content.contains("# Example configuration file for cidadao"));
        assert!(content.contains("indexes:"));
        assert!(content.contains("default_index:"));

        let config_dir = config_path.parent().unwrap();
        assert!(config_dir.join("rates/ipca.yaml").exists());
        assert!(config_dir.join("rates/poupanca.json").exists());

        Ok(())
    }

    #[test]
    fn test_setup_fails_if_config_exists() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.yaml");

        std::fs::write(&config_path, "test")?;

        let result = setup_at_path(&config_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));

        Ok(())
    }

    #[tokio::test]
    async fn test_example_config_loads_example_rates() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.yaml");
        setup_at_path(&config_path)?;

        let config = AppConfig::load_from_path(&config_path)?;
        assert!(!config.indexes.is_empty());
        assert!(config.default_index.is_some());

        let provider = FileRateProvider::from_config(&config);
        for index in &config.indexes {
            let table = provider.fetch_rates(&index.name).await?;
            assert!(!table.is_empty(), "{} has no rates", index.name);
        }

        Ok(())
    }
}
