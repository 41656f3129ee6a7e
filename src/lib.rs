//! # Spikewire
//!
//! Loads precomputed connectivity for spiking neural network simulators: flat
//! binary files holding pre-synaptic IDs, post-synaptic IDs, weights and delays
//! are decoded and registered with a simulation engine as one synapse group
//! between two layers.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! spikewire = "0.1"
//! ```
//!
//! ```rust,no_run
//! use spikewire::prelude::*;
//!
//! let mut engine = InMemorySynapseRegistry::new();
//! let input = engine.add_layer(784);
//! let hidden = engine.add_layer(128);
//!
//! let report = load_and_connect(
//!     input,
//!     hidden,
//!     SynapseGroupParams::default(),
//!     "input_to_hidden.bin",
//!     &mut engine,
//! )?;
//! assert_eq!(engine.synapse_group_count(), 1);
//! # Ok::<(), ConnectivityError>(())
//! ```
//!
//! ### Configured loading
//!
//! ```rust,no_run
//! use spikewire::prelude::*;
//!
//! let config = spikewire::config::load_config(None, None)?;
//! spikewire::config::validate_config(&config)?;
//! let loader = ConnectivityLoader::from_config(&config.connectivity);
//! # Ok::<(), spikewire::config::ConfigError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`observability`** (default): logging setup for binaries
//! - **`file-logging`**: JSON log files in timestamped run folders
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: spikewire-config                           │
//! │  (TOML + env + CLI overrides, validation)               │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Core: spikewire-connectivity                           │
//! │  (format, decode, reader/writer, registrar seam)        │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Engine: anything implementing SynapseGroupRegistrar    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use spikewire_config as config;
pub use spikewire_connectivity as connectivity;

#[cfg(feature = "observability")]
pub use spikewire_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::connectivity::{
        load_and_connect, ConnectivityError, ConnectivityLoader, InMemorySynapseRegistry,
        LayerId, LoadReport, LoaderOptions, PairwiseConnectivity, SynapseGroupId,
        SynapseGroupParams, SynapseGroupRegistrar,
    };
}
