use crate::application::config::models::GlueConfig;
use crate::common::error::{GlueError, Result};
use std::fs;

/// Parse configuration from TOML file
pub fn parse_config_file(path: &str) -> Result<GlueConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        GlueError::ConfigError(format!("Failed to read config file '{}': {}", path, e))
    })?;

    parse_config(&content)
}

/// Parse configuration from TOML string
pub fn parse_config(content: &str) -> Result<GlueConfig> {
    toml::from_str(content)
        .map_err(|e| GlueError::ConfigError(format!("Failed to parse TOML config: {}", e)))
}
