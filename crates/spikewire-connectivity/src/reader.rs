// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reading connectivity files from disk
//!
//! The file length is measured once, the layout is derived from it, and then each
//! of the four blocks is read with an exact byte count. A file that shrinks
//! between the size probe and the reads surfaces as [`ConnectivityError::ShortRead`].

use crate::{
    decode_f32_block, floats_to_ids, Block, ByteOrder, ConnectivityError, ConnectivityFormat,
    IdConversion, Layout, LoaderOptions, PairwiseConnectivity, Result, HEADER_LEN,
};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What a read found, for logging and reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadSummary {
    pub path: PathBuf,
    pub format: ConnectivityFormat,
    pub byte_order: ByteOrder,
    pub file_bytes: u64,
    pub record_count: usize,
    /// Headerless file decoded in host byte order without any confirmation
    pub byte_order_unverified: bool,
}

/// Read and decode a connectivity file
///
/// # Errors
/// - [`ConnectivityError::OpenFailure`] if the file cannot be opened
/// - [`ConnectivityError::FileTooLarge`] if the file exceeds `options.max_file_bytes`
/// - [`ConnectivityError::SizeMismatch`] / [`ConnectivityError::InvalidHeader`] for bad framing
/// - [`ConnectivityError::ShortRead`] if a block comes back short
/// - [`ConnectivityError::ConversionOverflow`] / [`ConnectivityError::FractionalId`] for bad IDs
pub fn read_connectivity<P: AsRef<Path>>(
    path: P,
    options: &LoaderOptions,
) -> Result<(PairwiseConnectivity, ReadSummary)> {
    let path = path.as_ref();

    let mut file = File::open(path).map_err(|source| {
        error!(
            target: crate::LOG_TARGET,
            "Issue opening connectivity file {}: {}",
            path.display(),
            source
        );
        ConnectivityError::OpenFailure {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(
        target: crate::LOG_TARGET,
        "Connectivity file {} opened, extracting synapse IDs, weights and delays",
        path.display()
    );

    let file_bytes = file.seek(SeekFrom::End(0))?;
    if let Some(limit) = options.max_file_bytes {
        if file_bytes > limit {
            return Err(ConnectivityError::FileTooLarge {
                len: file_bytes,
                limit,
            });
        }
    }

    file.seek(SeekFrom::Start(0))?;
    let mut prefix = Vec::with_capacity(HEADER_LEN);
    (&mut file).take(HEADER_LEN as u64).read_to_end(&mut prefix)?;

    let decode = &options.decode;
    let layout = Layout::resolve(file_bytes, &prefix, decode.format, decode.byte_order)?;
    debug!(
        target: crate::LOG_TARGET,
        "{}: {} format, {:?} byte order, {} records",
        path.display(),
        layout.format,
        layout.byte_order,
        layout.record_count
    );
    if layout.byte_order_unverified() {
        warn!(
            target: crate::LOG_TARGET,
            "{} has no header; decoding in host byte order, set byte_order if it was written elsewhere",
            path.display()
        );
    }

    file.seek(SeekFrom::Start(layout.body_offset as u64))?;
    let connectivity = read_blocks(&mut file, &layout, decode.id_conversion)?;

    let summary = ReadSummary {
        path: path.to_path_buf(),
        format: layout.format,
        byte_order: layout.byte_order,
        file_bytes,
        record_count: connectivity.len(),
        byte_order_unverified: layout.byte_order_unverified(),
    };
    Ok((connectivity, summary))
}

/// Read the four blocks described by `layout` from the current position of `reader`
pub fn read_blocks<R: Read>(
    reader: &mut R,
    layout: &Layout,
    id_conversion: IdConversion,
) -> Result<PairwiseConnectivity> {
    let block_len = layout.block_len();
    let order = layout.byte_order;

    let pre = decode_f32_block(&read_exact_block(reader, Block::Presynaptic, block_len)?, order);
    let post = decode_f32_block(&read_exact_block(reader, Block::Postsynaptic, block_len)?, order);
    let weights = decode_f32_block(&read_exact_block(reader, Block::Weights, block_len)?, order);
    let delays = decode_f32_block(&read_exact_block(reader, Block::Delays, block_len)?, order);

    PairwiseConnectivity::new(
        floats_to_ids(&pre, Block::Presynaptic, id_conversion)?,
        floats_to_ids(&post, Block::Postsynaptic, id_conversion)?,
        weights,
        delays,
    )
}

fn read_exact_block<R: Read>(reader: &mut R, block: Block, len: usize) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(len);
    reader.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(ConnectivityError::ShortRead {
            block,
            expected: len,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}
