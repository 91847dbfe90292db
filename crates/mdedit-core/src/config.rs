//! Editor configuration (YAML).
//!
//! Every field has a default, so a partial file (or none at all) is valid.

use crate::error::ConfigError;
use crate::search::SearchController;
use crate::table::TableBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Runtime configuration shared by hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Server base URL, e.g. `http://localhost:8000`.
    pub api_base_url: String,
    /// Project slug the editor works in.
    pub project: String,
    /// Article being edited, if any.
    pub article_id: Option<i64>,
    /// Search debounce in milliseconds.
    pub search_debounce_ms: u64,
    /// Rows of a new table (header included).
    pub table_rows: usize,
    /// Columns of a new table.
    pub table_cols: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            project: String::new(),
            article_id: None,
            search_debounce_ms: 300,
            table_rows: 3,
            table_cols: 3,
        }
    }
}

impl EditorConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config.clamp_table_size())
    }

    /// A table needs at least one row and one column, the same floor typed sizes get.
    fn clamp_table_size(mut self) -> Self {
        if self.table_rows == 0 || self.table_cols == 0 {
            tracing::warn!(
                rows = self.table_rows,
                cols = self.table_cols,
                "table size below 1x1 in config, clamping"
            );
            self.table_rows = self.table_rows.max(1);
            self.table_cols = self.table_cols.max(1);
        }
        self
    }

    /// Read and parse a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, otherwise use defaults. Parse errors are still reported.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Search debounce as a [`Duration`].
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// A table builder using the configured default size.
    pub fn table_builder(&self) -> TableBuilder {
        TableBuilder::new(self.table_rows, self.table_cols)
    }

    /// A search controller using the configured debounce.
    pub fn search_controller(&self) -> SearchController {
        SearchController::new(self.search_debounce())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = EditorConfig::from_yaml_str("project: demo\ntable_cols: 5\n").unwrap();
        assert_eq!(config.project, "demo");
        assert_eq!(config.table_cols, 5);
        assert_eq!(config.table_rows, 3);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(matches!(
            EditorConfig::from_yaml_str("table_rows: [1, 2]"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_zero_table_size_is_clamped() {
        let config = EditorConfig::from_yaml_str("table_rows: 0\ntable_cols: 0\n").unwrap();
        assert_eq!((config.table_rows, config.table_cols), (1, 1));

        let mut builder = config.table_builder();
        let grid = builder.open();
        assert_eq!((grid.rows(), grid.cols()), (1, 1));
    }

    #[test]
    fn test_missing_file_defaults() {
        let config = EditorConfig::load_or_default("/nonexistent/mdedit.yaml").unwrap();
        assert_eq!(config, EditorConfig::default());
    }
}
