use crate::domain::board::BoardConfig;
use crate::error::{GridError, Result};
use crate::view::table::TableConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Persisted layout of a feature's board and table views
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub table: TableConfig,
}

impl ViewConfig {
    /// Loads the config at `path`, falling back to the defaults when the
    /// file does not exist
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no view config found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).await?;
        let config: ViewConfig = serde_json::from_str(&contents)
            .map_err(|e| GridError::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        info!(path = %path.display(), board = %config.board.name, "loaded view config");
        Ok(config)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).await?;
        Ok(())
    }

    /// Rejects duplicate column keys and negative preview offsets
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for column in &self.board.columns {
            if !seen.insert(column.key.as_str()) {
                return Err(GridError::ConfigError(format!(
                    "duplicate board column '{}'",
                    column.key
                )));
            }
        }
        if self.board.preview_offset.is_nan() || self.board.preview_offset < 0.0 {
            return Err(GridError::ConfigError(format!(
                "preview offset must be non-negative, got {}",
                self.board.preview_offset
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::ColumnConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = ViewConfig::load(temp_dir.path().join("views.json"))
            .await
            .unwrap();
        assert_eq!(config, ViewConfig::default());
        assert_eq!(config.board.name, "Deals");
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config").join("views.json");

        let mut config = ViewConfig {
            board: BoardConfig::todo_board(),
            ..ViewConfig::default()
        };
        config.board.enable_dnd = false;
        config.save(&path).await.unwrap();

        let loaded = ViewConfig::load(&path).await.unwrap();
        assert_eq!(loaded, config);
        assert!(!loaded.board.enable_dnd);
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("views.json");
        tokio::fs::write(
            &path,
            r#"{"board": {"name": "Prospects", "columns": [{"key": "cold", "label": "Cold"}]}}"#,
        )
        .await
        .unwrap();

        let config = ViewConfig::load(&path).await.unwrap();
        assert_eq!(config.board.name, "Prospects");
        assert!(config.board.enable_dnd);
        assert_eq!(config.board.preview_offset, 12.0);
        assert_eq!(config.table, TableConfig::default());
    }

    #[tokio::test]
    async fn test_invalid_json_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("views.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let result = ViewConfig::load(&path).await;
        assert!(matches!(result, Err(GridError::ConfigError(_))));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let config = ViewConfig {
            board: BoardConfig::new(
                "Dupes",
                vec![ColumnConfig::new("a", "A"), ColumnConfig::new("a", "Again")],
            ),
            ..ViewConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ViewConfig::default().validate().is_ok());
    }
}
