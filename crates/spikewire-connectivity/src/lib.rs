// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Spikewire Connectivity
//!
//! Loads precomputed pairwise connectivity (pre-synaptic IDs, post-synaptic IDs,
//! weights, delays) from flat binary files and registers it with a simulation
//! engine as a synapse group between two layers.
//!
//! ## Design Goals
//! - **Compatible**: reads and writes the headerless four-block layout produced by
//!   external network-generation scripts
//! - **Strict**: size, truncation and ID conversion problems are errors, never
//!   silent truncation
//! - **Pure core**: decoding is a function of bytes only, the engine sits behind a
//!   single-method trait
//! - **Version-safe**: an optional header carries magic, version, byte order and
//!   record count
//!
//! ## Usage
//! ```no_run
//! use spikewire_connectivity::{
//!     load_and_connect, InMemorySynapseRegistry, SynapseGroupParams,
//! };
//!
//! let mut engine = InMemorySynapseRegistry::new();
//! let input = engine.add_layer(100);
//! let output = engine.add_layer(50);
//!
//! let report = load_and_connect(
//!     input,
//!     output,
//!     SynapseGroupParams::default(),
//!     "connectivity.bin",
//!     &mut engine,
//! )?;
//! println!("registered {} synapses", report.record_count);
//! # Ok::<(), spikewire_connectivity::ConnectivityError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use std::path::PathBuf;
use thiserror::Error;

mod conversion;
mod decode;
mod descriptor;
mod format;
mod loader;
mod reader;
mod registrar;
mod writer;

pub use conversion::*;
pub use decode::*;
pub use descriptor::*;
pub use format::*;
pub use loader::*;
pub use reader::*;
pub use registrar::*;
pub use writer::*;

/// Tracing target used by every log line of this crate
pub(crate) const LOG_TARGET: &str = "spikewire-connectivity";

/// Connectivity I/O errors
#[derive(Error, Debug)]
pub enum ConnectivityError {
    #[error("Failed to open connectivity file {path}: {source}")]
    OpenFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Size mismatch: {len} bytes is not a whole number of {record_bytes}-byte records ({remainder} bytes left over)")]
    SizeMismatch {
        len: u64,
        record_bytes: usize,
        remainder: u64,
    },

    #[error("Short read in {block} block: expected {expected} bytes, got {actual}")]
    ShortRead {
        block: Block,
        expected: usize,
        actual: usize,
    },

    #[error("{block} ID at index {index} ({value}) is outside the exactly representable integer range")]
    ConversionOverflow {
        block: Block,
        index: usize,
        value: f32,
    },

    #[error("{block} ID at index {index} ({value}) has a fractional part")]
    FractionalId {
        block: Block,
        index: usize,
        value: f32,
    },

    #[error("Block lengths differ: {presynaptic} pre, {postsynaptic} post, {weights} weights, {delays} delays")]
    LengthMismatch {
        presynaptic: usize,
        postsynaptic: usize,
        weights: usize,
        delays: usize,
    },

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported format version {file_version}, newest supported is {supported_version}")]
    UnsupportedVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("Connectivity file is {len} bytes, limit is {limit}")]
    FileTooLarge { len: u64, limit: u64 },

    #[error("Engine rejected synapse group: {0}")]
    Registration(#[from] RegistrarError),
}

pub type Result<T> = std::result::Result<T, ConnectivityError>;
