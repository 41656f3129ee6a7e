// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Conversion of float-encoded synapse IDs
//!
//! Generation scripts store layer-local IDs in the same f32 blocks as weights and
//! delays. Every integer in `±2^24` is exactly representable as f32, anything
//! outside that range may already have lost precision when it was written.

use crate::{Block, ConnectivityError, Result};

/// Largest magnitude at which every integer has an exact f32 representation
pub const MAX_EXACT_ID: f32 = 16_777_216.0;

/// How fractional ID values are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdConversion {
    /// Reject any ID with a fractional part
    #[default]
    Strict,
    /// Truncate toward zero, as older loaders did
    Truncate,
}

/// Convert one stored ID to an integer
pub fn float_to_id(value: f32, block: Block, index: usize, mode: IdConversion) -> Result<i32> {
    if !value.is_finite() || value.abs() > MAX_EXACT_ID {
        return Err(ConnectivityError::ConversionOverflow { block, index, value });
    }
    if mode == IdConversion::Strict && value.fract() != 0.0 {
        return Err(ConnectivityError::FractionalId { block, index, value });
    }
    // In range and finite, so the cast cannot saturate
    Ok(value.trunc() as i32)
}

/// Convert one ID to its stored f32 form
///
/// IDs beyond `±2^24` would be rounded on the way to f32, so they are rejected.
pub fn id_to_float(id: i32, block: Block, index: usize) -> Result<f32> {
    let value = id as f32;
    if id.unsigned_abs() > MAX_EXACT_ID as u32 {
        return Err(ConnectivityError::ConversionOverflow { block, index, value });
    }
    Ok(value)
}

/// Convert a whole ID block for writing, failing on the first unrepresentable ID
pub fn ids_to_floats(ids: &[i32], block: Block) -> Result<Vec<f32>> {
    ids.iter()
        .enumerate()
        .map(|(index, &id)| id_to_float(id, block, index))
        .collect()
}

/// Convert a whole ID block, failing on the first bad value
pub fn floats_to_ids(values: &[f32], block: Block, mode: IdConversion) -> Result<Vec<i32>> {
    values
        .iter()
        .enumerate()
        .map(|(index, &value)| float_to_id(value, block, index, mode))
        .collect()
}
