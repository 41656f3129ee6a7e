// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Loading a connectivity file into an engine as one synapse group

use crate::{
    read_connectivity, ByteOrder, ConnectivityFormat, DecodeOptions, FormatPolicy, IdConversion,
    LayerId, Result, SynapseGroupId, SynapseGroupParams, SynapseGroupRegistrar,
};
use spikewire_config::{ByteOrderSetting, ConnectivityConfig, FormatSetting};
use std::path::Path;
use tracing::info;

/// Options for [`ConnectivityLoader`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoaderOptions {
    pub decode: DecodeOptions,
    /// Refuse files larger than this many bytes
    pub max_file_bytes: Option<u64>,
}

impl From<&ConnectivityConfig> for LoaderOptions {
    fn from(config: &ConnectivityConfig) -> Self {
        let byte_order = match config.byte_order {
            ByteOrderSetting::Native => ByteOrder::Native,
            ByteOrderSetting::Little => ByteOrder::Little,
            ByteOrderSetting::Big => ByteOrder::Big,
        };
        let format = match config.format {
            FormatSetting::Legacy => FormatPolicy::Legacy,
            FormatSetting::Headered => FormatPolicy::Headered,
            FormatSetting::Auto => FormatPolicy::Auto,
        };
        let id_conversion = if config.strict_ids {
            IdConversion::Strict
        } else {
            IdConversion::Truncate
        };

        Self {
            decode: DecodeOptions {
                format,
                byte_order,
                id_conversion,
            },
            max_file_bytes: (config.max_file_bytes != 0).then_some(config.max_file_bytes),
        }
    }
}

/// Outcome of a successful [`ConnectivityLoader::load_and_connect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub group_id: SynapseGroupId,
    pub record_count: usize,
    pub format: ConnectivityFormat,
    pub file_bytes: u64,
}

/// Loads connectivity files and registers them with an engine
#[derive(Debug, Clone, Default)]
pub struct ConnectivityLoader {
    options: LoaderOptions,
}

impl ConnectivityLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &ConnectivityConfig) -> Self {
        Self::new(LoaderOptions::from(config))
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Read `source`, fill `template` with its pairwise connectivity and register
    /// it with `engine` as a group from `layer_a` to `layer_b`
    ///
    /// The engine is only called once the whole file has been read and
    /// validated, so any error leaves it untouched.
    pub fn load_and_connect<E, P>(
        &self,
        layer_a: LayerId,
        layer_b: LayerId,
        mut template: SynapseGroupParams,
        source: P,
        engine: &mut E,
    ) -> Result<LoadReport>
    where
        E: SynapseGroupRegistrar + ?Sized,
        P: AsRef<Path>,
    {
        let (connectivity, summary) = read_connectivity(source.as_ref(), &self.options)?;
        info!(
            target: crate::LOG_TARGET,
            "Connectivity file {} read: {} synapses ({})",
            summary.path.display(),
            summary.record_count,
            summary.format
        );

        template.apply_pairwise(connectivity);
        let group_id = engine.add_synapse_group(layer_a, layer_b, template)?;
        info!(
            target: crate::LOG_TARGET,
            "Registered synapse group {:?}: {} -> {}",
            group_id,
            layer_a,
            layer_b
        );

        Ok(LoadReport {
            group_id,
            record_count: summary.record_count,
            format: summary.format,
            file_bytes: summary.file_bytes,
        })
    }
}

/// [`ConnectivityLoader::load_and_connect`] with default options (legacy format,
/// native byte order, strict IDs)
pub fn load_and_connect<E, P>(
    layer_a: LayerId,
    layer_b: LayerId,
    template: SynapseGroupParams,
    source: P,
    engine: &mut E,
) -> Result<LoadReport>
where
    E: SynapseGroupRegistrar + ?Sized,
    P: AsRef<Path>,
{
    ConnectivityLoader::default().load_and_connect(layer_a, layer_b, template, source, engine)
}
