use super::models::EngineConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const TABLE_NAMES: [&str; 3] = ["playback", "timing", "logging"];

/// Load configuration from the given path, falling back to defaults on error.
pub fn load_config(path: &Path) -> EngineConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return EngineConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err:#}");
            EngineConfig::default()
        }
    }
}

/// Parse either the table layout or a legacy flat file.
pub fn parse_config(contents: &str) -> Result<EngineConfig> {
    let value: toml::Table = toml::from_str(contents).context("Parsing config TOML")?;
    if TABLE_NAMES.iter().any(|name| value.contains_key(*name)) {
        let tables: ConfigTables = toml::from_str(contents).context("Reading config tables")?;
        Ok(tables.into())
    } else {
        toml::from_str::<EngineConfig>(contents).context("Reading flat config")
    }
}

pub fn serialize_config(config: &EngineConfig) -> Result<String> {
    toml::to_string(&ConfigTables::from(config)).context("Serializing config")
}
