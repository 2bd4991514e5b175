use crate::application::config::models::GlueConfig;
use crate::common::constants::{LOOPER_ID_INPUT, MAX_EVENTS_LIMIT};
use crate::common::error::{GlueError, Result};
use tracing_subscriber::EnvFilter;

/// Validate configuration for correctness and consistency
pub fn validate_config(config: &GlueConfig) -> Result<()> {
    validate_looper_settings(config)?;
    validate_log_settings(config)?;
    Ok(())
}

fn validate_looper_settings(config: &GlueConfig) -> Result<()> {
    // Identifiers up to LOOPER_ID_INPUT belong to the app glue
    if config.base_ident <= LOOPER_ID_INPUT {
        return Err(GlueError::ConfigError(format!(
            "base_ident must be greater than {}, got {}",
            LOOPER_ID_INPUT, config.base_ident
        )));
    }

    if config.max_events == 0 || config.max_events > MAX_EVENTS_LIMIT {
        return Err(GlueError::ConfigError(format!(
            "max_events must be between 1 and {}, got {}",
            MAX_EVENTS_LIMIT, config.max_events
        )));
    }

    Ok(())
}

fn validate_log_settings(config: &GlueConfig) -> Result<()> {
    if config.log_tag.is_empty() {
        return Err(GlueError::ConfigError("log_tag cannot be empty".to_string()));
    }

    if config.log_tag.contains('\0') {
        return Err(GlueError::ConfigError(
            "log_tag cannot contain NUL characters".to_string(),
        ));
    }

    EnvFilter::try_new(&config.log_filter).map_err(|e| {
        GlueError::ConfigError(format!("Invalid log_filter '{}': {}", config.log_filter, e))
    })?;

    Ok(())
}
