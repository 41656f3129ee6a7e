// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pure decoding of connectivity bytes into four parallel arrays

use crate::{
    floats_to_ids, record_count_for, Block, ByteOrder, ConnectivityError, FormatPolicy,
    IdConversion, Layout, Result, VALUE_BYTES,
};

/// Options shared by every decode path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub format: FormatPolicy,
    /// Byte order assumed for headerless files (headered files carry their own)
    pub byte_order: ByteOrder,
    pub id_conversion: IdConversion,
}

/// A single synapse, as stored at position `i` of the four blocks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseRecord {
    pub presynaptic_id: i32,
    pub postsynaptic_id: i32,
    pub weight: f32,
    pub delay: f32,
}

/// Explicit pairwise connectivity: four equal-length sequences in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairwiseConnectivity {
    presynaptic_ids: Vec<i32>,
    postsynaptic_ids: Vec<i32>,
    weights: Vec<f32>,
    delays: Vec<f32>,
}

impl PairwiseConnectivity {
    pub fn new(
        presynaptic_ids: Vec<i32>,
        postsynaptic_ids: Vec<i32>,
        weights: Vec<f32>,
        delays: Vec<f32>,
    ) -> Result<Self> {
        let n = presynaptic_ids.len();
        if postsynaptic_ids.len() != n || weights.len() != n || delays.len() != n {
            return Err(ConnectivityError::LengthMismatch {
                presynaptic: n,
                postsynaptic: postsynaptic_ids.len(),
                weights: weights.len(),
                delays: delays.len(),
            });
        }
        Ok(Self {
            presynaptic_ids,
            postsynaptic_ids,
            weights,
            delays,
        })
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = SynapseRecord>,
    {
        let mut connectivity = Self::default();
        for record in records {
            connectivity.presynaptic_ids.push(record.presynaptic_id);
            connectivity.postsynaptic_ids.push(record.postsynaptic_id);
            connectivity.weights.push(record.weight);
            connectivity.delays.push(record.delay);
        }
        connectivity
    }

    pub fn len(&self) -> usize {
        self.presynaptic_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presynaptic_ids.is_empty()
    }

    pub fn presynaptic_ids(&self) -> &[i32] {
        &self.presynaptic_ids
    }

    pub fn postsynaptic_ids(&self) -> &[i32] {
        &self.postsynaptic_ids
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn delays(&self) -> &[f32] {
        &self.delays
    }

    pub fn records(&self) -> impl Iterator<Item = SynapseRecord> + '_ {
        (0..self.len()).map(move |i| SynapseRecord {
            presynaptic_id: self.presynaptic_ids[i],
            postsynaptic_id: self.postsynaptic_ids[i],
            weight: self.weights[i],
            delay: self.delays[i],
        })
    }

    /// Split into (pre IDs, post IDs, weights, delays)
    pub fn into_parts(self) -> (Vec<i32>, Vec<i32>, Vec<f32>, Vec<f32>) {
        (
            self.presynaptic_ids,
            self.postsynaptic_ids,
            self.weights,
            self.delays,
        )
    }
}

/// Decode one block of f32 values
///
/// Trailing bytes that do not form a whole value are ignored; callers validate
/// block lengths before decoding.
pub fn decode_f32_block(bytes: &[u8], byte_order: ByteOrder) -> Vec<f32> {
    let mut values = vec![0.0f32; bytes.len() / VALUE_BYTES];
    byte_order.read_f32_into(&bytes[..values.len() * VALUE_BYTES], &mut values);
    values
}

/// Decode a headerless body of four equal f32 blocks
pub fn decode_body(
    body: &[u8],
    byte_order: ByteOrder,
    id_conversion: IdConversion,
) -> Result<PairwiseConnectivity> {
    let block_len = record_count_for(body.len() as u64)? * VALUE_BYTES;

    let (pre, rest) = body.split_at(block_len);
    let (post, rest) = rest.split_at(block_len);
    let (weights, delays) = rest.split_at(block_len);

    PairwiseConnectivity::new(
        floats_to_ids(&decode_f32_block(pre, byte_order), Block::Presynaptic, id_conversion)?,
        floats_to_ids(&decode_f32_block(post, byte_order), Block::Postsynaptic, id_conversion)?,
        decode_f32_block(weights, byte_order),
        decode_f32_block(delays, byte_order),
    )
}

/// Decode a complete in-memory connectivity file
pub fn decode_connectivity(bytes: &[u8], options: &DecodeOptions) -> Result<PairwiseConnectivity> {
    let layout = Layout::resolve(bytes.len() as u64, bytes, options.format, options.byte_order)?;
    decode_body(
        &bytes[layout.body_offset..],
        layout.byte_order,
        options.id_conversion,
    )
}
