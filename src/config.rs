use crate::deleter::DEFAULT_MAX_IN_FLIGHT;
use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;
use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:8087";

/// Immutable run configuration, passed into the engine at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the local vault-management API.
    pub base_url: String,
    /// Restrict the fetch to one vault folder.
    pub folder_id: Option<String>,
    /// Restrict the fetch to a search term.
    pub search: Option<String>,
    /// Cap on simultaneously in-flight delete operations.
    pub max_concurrent_deletes: usize,
    /// Flat canonical records written by the `export` subcommand.
    pub export_path: String,
    /// Survivor records, written after every dedup pass.
    pub kept_path: String,
    /// Discarded records, written after every dedup pass.
    pub discarded_path: String,
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    // `.env` is loaded by main before this runs; URL matches the variable
    // the vault serve wrapper exports.
    let base_url = env::var("URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let builder = Config::builder()
        .set_default("base_url", base_url)?
        .set_default("max_concurrent_deletes", DEFAULT_MAX_IN_FLIGHT as i64)?
        .set_default("export_path", "data/clean.json")?
        .set_default("kept_path", "data/kept.json")?
        .set_default("discarded_path", "data/discarded.json")?
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;

    builder.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let config = load_configuration().unwrap();
        assert_eq!(config.max_concurrent_deletes, DEFAULT_MAX_IN_FLIGHT);
        assert_eq!(config.kept_path, "data/kept.json");
        assert_eq!(config.discarded_path, "data/discarded.json");
        assert_eq!(config.folder_id, None);
        assert!(config.base_url.starts_with("http"));
    }
}
