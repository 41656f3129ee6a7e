// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation

use crate::{ConfigError, ConfigResult, SpikewireConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Smallest non-zero file size limit: one synapse record
const MIN_FILE_LIMIT: u64 = 16;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &SpikewireConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_connectivity(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_connectivity(config: &SpikewireConfig, errors: &mut Vec<ConfigValidationError>) {
    let limit = config.connectivity.max_file_bytes;
    if limit != 0 && limit < MIN_FILE_LIMIT {
        errors.push(ConfigValidationError::InvalidValue {
            field: "connectivity.max_file_bytes".to_string(),
            reason: format!("{} is smaller than one record ({} bytes); use 0 for no limit", limit, MIN_FILE_LIMIT),
        });
    }
}

fn validate_logging(config: &SpikewireConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if level.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "logging.level".to_string(),
        });
    } else if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("'{}' is not one of {}", config.logging.level, LOG_LEVELS.join(", ")),
        });
    }

    if let Some(path) = &config.logging.file_path {
        if path.as_os_str().is_empty() {
            errors.push(ConfigValidationError::InvalidValue {
                field: "logging.file_path".to_string(),
                reason: "path is empty".to_string(),
            });
        }
    }
}
