use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// A named index and the file holding its monthly rates.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct IndexConfig {
    pub name: String,
    pub path: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub indexes: Vec<IndexConfig>,
    pub default_index: Option<String>,
    #[serde(default)]
    pub include_bonus: bool,
    /// Directory of the loaded config file; relative index paths resolve
    /// against it.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("br", "cidadao", "cidadao")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn find_index(&self, name: &str) -> Option<&IndexConfig> {
        self.indexes
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Display name of an index: its name, followed by the configured
    /// description when there is one.
    pub fn index_title(&self, name: &str) -> String {
        match self.find_index(name).and_then(|i| i.description.as_deref()) {
            Some(description) => format!("{name} ({description})"),
            None => name.to_string(),
        }
    }

    /// Absolute or config-relative location of an index's rate file.
    pub fn resolve_path(&self, index: &IndexConfig) -> PathBuf {
        let path = PathBuf::from(&index.path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
default_index: ipca
include_bonus: true
indexes:
  - name: ipca
    path: rates/ipca.yaml
    description: "Consumer price index"
  - name: poupanca
    path: /var/lib/cidadao/poupanca.json
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.indexes.len(), 2);
        assert_eq!(config.default_index.as_deref(), Some("ipca"));
        assert!(config.include_bonus);
        assert_eq!(config.indexes[0].name, "ipca");
        assert_eq!(
            config.indexes[0].description.as_deref(),
            Some("Consumer price index")
        );
        assert!(config.indexes[1].description.is_none());
        assert!(config.base_dir.is_none());

        let minimal: AppConfig = serde_yaml::from_str("indexes: []").unwrap();
        assert!(minimal.indexes.is_empty());
        assert!(minimal.default_index.is_none());
        assert!(!minimal.include_bonus);
    }

    #[test]
    fn test_find_index_ignores_case() {
        let config: AppConfig = serde_yaml::from_str(
            r#"
indexes:
  - name: IPCA
    path: ipca.yaml
"#,
        )
        .unwrap();
        assert!(config.find_index("ipca").is_some());
        assert!(config.find_index(" Ipca ").is_some());
        assert!(config.find_index("selic").is_none());
    }

    #[test]
    fn test_index_title_uses_description() {
        let config: AppConfig = serde_yaml::from_str(
            r#"
indexes:
  - name: ipca
    path: ipca.yaml
    description: Consumer price index
  - name: poupanca
    path: poupanca.json
"#,
        )
        .unwrap();
        assert_eq!(config.index_title("ipca"), "ipca (Consumer price index)");
        assert_eq!(config.index_title("poupanca"), "poupanca");
        assert_eq!(config.index_title("selic"), "selic");
    }

    #[test]
    fn test_load_from_path_resolves_relative_paths() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config_path = dir.path().join("config.yaml");
        fs::write(
            &config_path,
            r#"
indexes:
  - name: ipca
    path: rates/ipca.yaml
  - name: poupanca
    path: /abs/poupanca.yaml
"#,
        )?;

        let config = AppConfig::load_from_path(&config_path)?;
        assert_eq!(config.base_dir.as_deref(), Some(dir.path()));
        assert_eq!(
            config.resolve_path(&config.indexes[0]),
            dir.path().join("rates/ipca.yaml")
        );
        assert_eq!(
            config.resolve_path(&config.indexes[1]),
            PathBuf::from("/abs/poupanca.yaml")
        );
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/cidadao/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
