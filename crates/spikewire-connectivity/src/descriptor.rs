// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapse group descriptor handed to the simulation engine

use crate::PairwiseConnectivity;
use std::fmt;

/// Engine-side identifier of a layer (neuron population)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub i32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}", self.0)
    }
}

/// Engine-side identifier of a registered synapse group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SynapseGroupId(pub usize);

/// How the engine should interpret a synapse group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    #[default]
    AllToAll,
    OneToOne,
    Random,
    /// Every synapse listed explicitly by (pre, post) pair
    Pairwise,
}

/// Parameters of a synapse group
///
/// Callers fill in the engine-specific fields and pass the value as a template;
/// the loader fills the pairwise sequences and switches the connectivity type to
/// [`ConnectivityType::Pairwise`].
#[derive(Debug, Clone, PartialEq)]
pub struct SynapseGroupParams {
    pub connectivity_type: ConnectivityType,
    pub weight_scaling_constant: f32,
    pub label: Option<String>,
    pub pairwise_connect_presynaptic: Vec<i32>,
    pub pairwise_connect_postsynaptic: Vec<i32>,
    pub pairwise_connect_weight: Vec<f32>,
    pub pairwise_connect_delay: Vec<f32>,
}

impl Default for SynapseGroupParams {
    fn default() -> Self {
        Self {
            connectivity_type: ConnectivityType::default(),
            weight_scaling_constant: 1.0,
            label: None,
            pairwise_connect_presynaptic: Vec::new(),
            pairwise_connect_postsynaptic: Vec::new(),
            pairwise_connect_weight: Vec::new(),
            pairwise_connect_delay: Vec::new(),
        }
    }
}

impl SynapseGroupParams {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Move decoded connectivity into the pairwise fields
    pub fn apply_pairwise(&mut self, connectivity: PairwiseConnectivity) {
        let (pre, post, weights, delays) = connectivity.into_parts();
        self.connectivity_type = ConnectivityType::Pairwise;
        self.pairwise_connect_presynaptic = pre;
        self.pairwise_connect_postsynaptic = post;
        self.pairwise_connect_weight = weights;
        self.pairwise_connect_delay = delays;
    }

    /// Number of explicitly listed synapses
    pub fn pairwise_len(&self) -> usize {
        self.pairwise_connect_presynaptic.len()
    }
}
