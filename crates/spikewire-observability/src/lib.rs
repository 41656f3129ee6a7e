// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikewire-observability
//!
//! Logging setup shared by Spikewire binaries, with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: JSON log file in a timestamped run folder (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known Spikewire crate names (tracing targets) for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "spikewire",
    "spikewire-config",
    "spikewire-connectivity",
    "spikewire-observability",
];
