use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::store::config::StoreConfig;
use crate::store::search::MatchMode;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    #[serde(rename = "type")]
    pub db_type: String,
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// Substring matching when true, prefix matching when false.
    #[serde(default = "default_enable_medial_search")]
    pub enable_medial_search: bool,
}

fn default_enable_medial_search() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enable_medial_search: default_enable_medial_search(),
        }
    }
}

impl SearchConfig {
    /// Resolve the configured matching mode once; the store receives the
    /// resolved value instead of reading configuration per search call.
    pub fn match_mode(&self) -> MatchMode {
        if self.enable_medial_search {
            MatchMode::Medial
        } else {
            MatchMode::Prefix
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::Configuration(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .map_err(|e| EngineError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory SQLite with defaults, for development and testing.
    pub fn default_config() -> Self {
        Self {
            database: DatabaseConfig {
                db_type: "sqlite".to_string(),
                url: ":memory:".to_string(),
                max_connections: 1,
            },
            search: SearchConfig::default(),
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.database.db_type != "sqlite" {
            return Err(EngineError::Configuration(format!(
                "Unsupported database type: {}",
                self.database.db_type
            )));
        }
        if self.database.url.is_empty() {
            return Err(EngineError::Configuration(
                "Database URL cannot be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(EngineError::Configuration(
                "Max connections must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_store_config(&self) -> EngineResult<StoreConfig> {
        self.validate()?;
        Ok(StoreConfig::sqlite(self.database.url.clone())
            .with_max_connections(self.database.max_connections)
            .with_match_mode(self.search.match_mode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
database:
  type: sqlite
  url: "sqlite:./membership.db"
  max_connections: 4
search:
  enable_medial_search: false
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.db_type, "sqlite");
        assert_eq!(config.database.max_connections, 4);
        assert_eq!(config.search.match_mode(), MatchMode::Prefix);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_search_section_defaults_to_medial() {
        let yaml = r#"
database:
  type: sqlite
  url: ":memory:"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.search.enable_medial_search);
        assert_eq!(config.search.match_mode(), MatchMode::Medial);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_validate_rejects_unknown_database() {
        let mut config = AppConfig::default_config();
        config.database.db_type = "oracle".to_string();
        assert!(config.validate().is_err());

        config.database.db_type = "sqlite".to_string();
        config.database.url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_store_config_carries_match_mode() {
        let mut config = AppConfig::default_config();
        config.search.enable_medial_search = false;
        let store_config = config.to_store_config().unwrap();
        assert_eq!(store_config.match_mode, MatchMode::Prefix);
        assert_eq!(store_config.connection_url, ":memory:");
    }
}
