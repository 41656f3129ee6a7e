// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::types::parse_bool;
use crate::{ConfigError, ConfigResult, SpikewireConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "spikewire.toml";

/// Find the Spikewire configuration file
///
/// Search order:
/// 1. `SPIKEWIRE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./spikewire.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SPIKEWIRE_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by SPIKEWIRE_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Spikewire configuration file '{}' not found in any of these locations:\n{}\n\nSet SPIKEWIRE_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikewireConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SpikewireConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Load configuration, falling back to defaults when no file can be found
///
/// An explicit `config_path` or a `SPIKEWIRE_CONFIG_PATH` that cannot be read is
/// an error. Only the directory search may come up empty, in which case the
/// defaults are used with environment and CLI overrides applied on top.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikewireConfig> {
    if config_path.is_some() || env::var_os("SPIKEWIRE_CONFIG_PATH").is_some() {
        return load_config(config_path, cli_args);
    }

    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args),
        Err(ConfigError::FileNotFound(_)) => {
            let mut config = SpikewireConfig::default();
            apply_environment_overrides(&mut config);
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli);
            }
            Ok(config)
        }
        Err(e) => Err(e),
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPIKEWIRE_BYTE_ORDER` -> `connectivity.byte_order`
/// - `SPIKEWIRE_FORMAT` -> `connectivity.format`
/// - `SPIKEWIRE_STRICT_IDS` -> `connectivity.strict_ids`
/// - `SPIKEWIRE_MAX_FILE_BYTES` -> `connectivity.max_file_bytes`
/// - `SPIKEWIRE_LOG_LEVEL` -> `logging.level`
///
/// Unparseable values are ignored.
pub fn apply_environment_overrides(config: &mut SpikewireConfig) {
    let vars: HashMap<String, String> = [
        ("byte_order", "SPIKEWIRE_BYTE_ORDER"),
        ("format", "SPIKEWIRE_FORMAT"),
        ("strict_ids", "SPIKEWIRE_STRICT_IDS"),
        ("max_file_bytes", "SPIKEWIRE_MAX_FILE_BYTES"),
        ("log_level", "SPIKEWIRE_LOG_LEVEL"),
    ]
    .into_iter()
    .filter_map(|(key, var)| env::var(var).ok().map(|value| (key.to_string(), value)))
    .collect();

    apply_cli_overrides(config, &vars);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"format": "auto", "log_level": "debug"}`)
pub fn apply_cli_overrides(config: &mut SpikewireConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("byte_order") {
        if let Ok(order) = value.parse() {
            config.connectivity.byte_order = order;
        }
    }
    if let Some(value) = cli_args.get("format") {
        if let Ok(format) = value.parse() {
            config.connectivity.format = format;
        }
    }
    if let Some(value) = cli_args.get("strict_ids") {
        config.connectivity.strict_ids = parse_bool(value);
    }
    if let Some(value) = cli_args.get("max_file_bytes") {
        if let Ok(bytes) = value.parse::<u64>() {
            config.connectivity.max_file_bytes = bytes;
        }
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}
