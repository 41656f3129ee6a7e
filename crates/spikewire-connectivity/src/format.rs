// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Framing of connectivity files
//!
//! ```text
//! [Legacy]
//! [ N × f32 ] pre-synaptic IDs
//! [ N × f32 ] post-synaptic IDs
//! [ N × f32 ] weights
//! [ N × f32 ] delays
//!
//! [Headered, version 1]
//! - Magic: "SPKWCONN" (8 bytes)
//! - Version: u32 LE (4 bytes)
//! - Flags: u32 LE (4 bytes) - bit 0: body is big-endian
//! - Record count: u64 LE (8 bytes)
//! - Legacy body (exactly 16 × N bytes)
//! ```

use crate::{ConnectivityError, Result};
use byteorder::{BigEndian, ByteOrder as _, LittleEndian, NativeEndian};
use std::fmt;

/// Magic number for headered connectivity files
pub const MAGIC: &[u8; 8] = b"SPKWCONN";

/// Current headered format version
pub const FORMAT_VERSION: u32 = 1;

/// Size of the version 1 header in bytes
pub const HEADER_LEN: usize = 24;

/// Bytes per stored value (single-precision float)
pub const VALUE_BYTES: usize = std::mem::size_of::<f32>();

/// Number of parallel blocks in the body
pub const BLOCK_COUNT: usize = 4;

/// Bytes occupied by one synapse record across all four blocks
pub const RECORD_BYTES: usize = VALUE_BYTES * BLOCK_COUNT;

const FLAG_BIG_ENDIAN: u32 = 1;
const KNOWN_FLAGS: u32 = FLAG_BIG_ENDIAN;

/// One of the four positional blocks of the body, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Presynaptic,
    Postsynaptic,
    Weights,
    Delays,
}

impl Block {
    /// All blocks in the order they appear in the file
    pub const ALL: [Block; BLOCK_COUNT] = [
        Block::Presynaptic,
        Block::Postsynaptic,
        Block::Weights,
        Block::Delays,
    ];
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Block::Presynaptic => "pre-synaptic",
            Block::Postsynaptic => "post-synaptic",
            Block::Weights => "weight",
            Block::Delays => "delay",
        };
        f.write_str(name)
    }
}

/// Byte order of the float values in the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Whatever the host uses (legacy files carry no byte order tag)
    #[default]
    Native,
    Little,
    Big,
}

impl ByteOrder {
    /// Map `Native` to the host's concrete byte order
    pub fn resolve(self) -> ByteOrder {
        match self {
            ByteOrder::Native if cfg!(target_endian = "big") => ByteOrder::Big,
            ByteOrder::Native => ByteOrder::Little,
            concrete => concrete,
        }
    }

    /// Decode `src` into `dst`; `src` must hold exactly `dst.len()` values
    pub fn read_f32_into(self, src: &[u8], dst: &mut [f32]) {
        match self {
            ByteOrder::Native => NativeEndian::read_f32_into(src, dst),
            ByteOrder::Little => LittleEndian::read_f32_into(src, dst),
            ByteOrder::Big => BigEndian::read_f32_into(src, dst),
        }
    }

    /// Encode `src` into `dst`; `dst` must hold exactly `src.len()` values
    pub fn write_f32_into(self, src: &[f32], dst: &mut [u8]) {
        match self {
            ByteOrder::Native => NativeEndian::write_f32_into(src, dst),
            ByteOrder::Little => LittleEndian::write_f32_into(src, dst),
            ByteOrder::Big => BigEndian::write_f32_into(src, dst),
        }
    }
}

/// Concrete on-disk format of a connectivity file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityFormat {
    /// Headerless four-block layout, record count inferred from file size
    Legacy,
    /// Version 1 header followed by the legacy body
    Headered,
}

impl fmt::Display for ConnectivityFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectivityFormat::Legacy => f.write_str("legacy"),
            ConnectivityFormat::Headered => write!(f, "headered v{}", FORMAT_VERSION),
        }
    }
}

/// How a reader chooses the format of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatPolicy {
    #[default]
    Legacy,
    Headered,
    /// Headered if the file starts with [`MAGIC`], legacy otherwise
    Auto,
}

impl FormatPolicy {
    pub fn detect(self, prefix: &[u8]) -> ConnectivityFormat {
        match self {
            FormatPolicy::Legacy => ConnectivityFormat::Legacy,
            FormatPolicy::Headered => ConnectivityFormat::Headered,
            FormatPolicy::Auto if prefix.starts_with(MAGIC) => ConnectivityFormat::Headered,
            FormatPolicy::Auto => ConnectivityFormat::Legacy,
        }
    }
}

/// Decoded version 1 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityHeader {
    pub version: u32,
    pub byte_order: ByteOrder,
    pub record_count: u64,
}

impl ConnectivityHeader {
    pub fn new(record_count: usize, byte_order: ByteOrder) -> Self {
        Self {
            version: FORMAT_VERSION,
            byte_order: byte_order.resolve(),
            record_count: record_count as u64,
        }
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let flags = match self.byte_order.resolve() {
            ByteOrder::Big => FLAG_BIG_ENDIAN,
            _ => 0,
        };

        let mut out = [0u8; HEADER_LEN];
        out[0..8].copy_from_slice(MAGIC);
        out[8..12].copy_from_slice(&self.version.to_le_bytes());
        out[12..16].copy_from_slice(&flags.to_le_bytes());
        out[16..24].copy_from_slice(&self.record_count.to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(ConnectivityError::InvalidHeader(format!(
                "need {} bytes, file has {}",
                HEADER_LEN,
                bytes.len()
            )));
        }
        if &bytes[0..8] != MAGIC {
            return Err(ConnectivityError::InvalidHeader(format!(
                "bad magic {:?}",
                &bytes[0..8]
            )));
        }

        let version = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        if version != FORMAT_VERSION {
            return Err(ConnectivityError::UnsupportedVersion {
                file_version: version,
                supported_version: FORMAT_VERSION,
            });
        }

        let flags = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        if flags & !KNOWN_FLAGS != 0 {
            return Err(ConnectivityError::InvalidHeader(format!(
                "unknown flag bits {:#x}",
                flags & !KNOWN_FLAGS
            )));
        }
        let byte_order = if flags & FLAG_BIG_ENDIAN != 0 {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        };

        let mut count_bytes = [0u8; 8];
        count_bytes.copy_from_slice(&bytes[16..24]);

        Ok(Self {
            version,
            byte_order,
            record_count: u64::from_le_bytes(count_bytes),
        })
    }
}

/// Record count N for a body of `body_len` bytes
///
/// The body must hold exactly four equal blocks of f32, so its length has to be
/// a multiple of [`RECORD_BYTES`].
pub fn record_count_for(body_len: u64) -> Result<usize> {
    let remainder = body_len % RECORD_BYTES as u64;
    if remainder != 0 {
        return Err(ConnectivityError::SizeMismatch {
            len: body_len,
            record_bytes: RECORD_BYTES,
            remainder,
        });
    }
    usize::try_from(body_len / RECORD_BYTES as u64).map_err(|_| {
        ConnectivityError::InvalidHeader(format!("{} bytes does not fit in memory", body_len))
    })
}

/// Where the body starts, how many records it holds and how to read it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub format: ConnectivityFormat,
    pub byte_order: ByteOrder,
    pub body_offset: usize,
    pub record_count: usize,
}

impl Layout {
    /// Bytes occupied by each of the four blocks
    pub fn block_len(&self) -> usize {
        self.record_count * VALUE_BYTES
    }

    /// Whether the body will be decoded in a byte order nothing in the file confirms
    ///
    /// Headerless files read as `Native` rely on the writer having used the same
    /// host byte order.
    pub fn byte_order_unverified(&self) -> bool {
        self.format == ConnectivityFormat::Legacy && self.byte_order == ByteOrder::Native
    }

    /// Resolve the layout of a file of `file_len` bytes starting with `prefix`
    ///
    /// `prefix` must contain at least the first [`HEADER_LEN`] bytes of the file
    /// (or the whole file if it is shorter).
    pub fn resolve(
        file_len: u64,
        prefix: &[u8],
        policy: FormatPolicy,
        byte_order: ByteOrder,
    ) -> Result<Self> {
        match policy.detect(prefix) {
            ConnectivityFormat::Legacy => Ok(Self {
                format: ConnectivityFormat::Legacy,
                byte_order,
                body_offset: 0,
                record_count: record_count_for(file_len)?,
            }),
            ConnectivityFormat::Headered => {
                let header = ConnectivityHeader::decode(prefix)?;
                let record_count = record_count_for(file_len.saturating_sub(HEADER_LEN as u64))?;
                if header.record_count != record_count as u64 {
                    return Err(ConnectivityError::InvalidHeader(format!(
                        "header declares {} records, body holds {}",
                        header.record_count, record_count
                    )));
                }
                Ok(Self {
                    format: ConnectivityFormat::Headered,
                    byte_order: header.byte_order,
                    body_offset: HEADER_LEN,
                    record_count,
                })
            }
        }
    }
}
