// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `spikewire.toml`.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikewireConfig {
    pub connectivity: ConnectivityConfig,
    pub logging: LoggingConfig,
}

/// Byte order of headerless connectivity files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteOrderSetting {
    #[default]
    Native,
    Little,
    Big,
}

impl FromStr for ByteOrderSetting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "little" | "le" => Ok(Self::Little),
            "big" | "be" => Ok(Self::Big),
            other => Err(ConfigError::InvalidValue(format!("byte_order: {}", other))),
        }
    }
}

/// Which connectivity file format the loader expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatSetting {
    #[default]
    Legacy,
    Headered,
    Auto,
}

impl FromStr for FormatSetting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "headered" => Ok(Self::Headered),
            "auto" => Ok(Self::Auto),
            other => Err(ConfigError::InvalidValue(format!("format: {}", other))),
        }
    }
}

/// Connectivity loading configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub byte_order: ByteOrderSetting,
    pub format: FormatSetting,
    /// Reject fractional synapse IDs instead of truncating them
    pub strict_ids: bool,
    /// Largest accepted file in bytes, 0 = unlimited
    pub max_file_bytes: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrderSetting::Native,
            format: FormatSetting::Legacy,
            strict_ids: true,
            max_file_bytes: 0,
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
    /// Directory for log files (requires the `file-logging` feature of spikewire-observability)
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            file_path: None,
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}
