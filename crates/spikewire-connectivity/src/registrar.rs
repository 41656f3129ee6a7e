// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The engine seam: registering synapse groups
//!
//! The loader only needs one operation from a simulation engine. Engines
//! implement [`SynapseGroupRegistrar`]; [`InMemorySynapseRegistry`] is a plain
//! reference implementation for tests and tooling.

use crate::{LayerId, SynapseGroupId, SynapseGroupParams};
use ahash::AHashMap;
use thiserror::Error;

/// Errors an engine may report when asked to add a synapse group
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrarError {
    #[error("Unknown {0}")]
    UnknownLayer(LayerId),

    #[error("{0}")]
    Rejected(String),
}

/// Anything that can own synapse groups between layers
pub trait SynapseGroupRegistrar {
    /// Append a synapse group connecting `pre_layer` to `post_layer`
    fn add_synapse_group(
        &mut self,
        pre_layer: LayerId,
        post_layer: LayerId,
        params: SynapseGroupParams,
    ) -> Result<SynapseGroupId, RegistrarError>;
}

/// A registered synapse group
#[derive(Debug, Clone, PartialEq)]
pub struct SynapseGroup {
    pub pre_layer: LayerId,
    pub post_layer: LayerId,
    pub params: SynapseGroupParams,
}

/// In-memory layer table and synapse group list
#[derive(Debug, Default)]
pub struct InMemorySynapseRegistry {
    layers: AHashMap<LayerId, usize>,
    groups: Vec<SynapseGroup>,
    next_layer: i32,
}

impl InMemorySynapseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer of `size` units and return its ID
    pub fn add_layer(&mut self, size: usize) -> LayerId {
        let id = LayerId(self.next_layer);
        self.next_layer += 1;
        self.layers.insert(id, size);
        id
    }

    pub fn layer_size(&self, layer: LayerId) -> Option<usize> {
        self.layers.get(&layer).copied()
    }

    pub fn synapse_group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn group(&self, id: SynapseGroupId) -> Option<&SynapseGroup> {
        self.groups.get(id.0)
    }

    pub fn groups(&self) -> &[SynapseGroup] {
        &self.groups
    }

    /// Total explicitly listed synapses across all groups
    pub fn total_synapses(&self) -> usize {
        self.groups.iter().map(|g| g.params.pairwise_len()).sum()
    }
}

impl SynapseGroupRegistrar for InMemorySynapseRegistry {
    fn add_synapse_group(
        &mut self,
        pre_layer: LayerId,
        post_layer: LayerId,
        params: SynapseGroupParams,
    ) -> Result<SynapseGroupId, RegistrarError> {
        for layer in [pre_layer, post_layer] {
            if !self.layers.contains_key(&layer) {
                return Err(RegistrarError::UnknownLayer(layer));
            }
        }

        let id = SynapseGroupId(self.groups.len());
        self.groups.push(SynapseGroup {
            pre_layer,
            post_layer,
            params,
        });
        Ok(id)
    }
}
