// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Writing connectivity files in either format

use crate::{
    ids_to_floats, Block, ByteOrder, ConnectivityFormat, ConnectivityHeader,
    PairwiseConnectivity, Result, HEADER_LEN, RECORD_BYTES, VALUE_BYTES,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Encode connectivity into the bytes of a connectivity file
///
/// For [`ConnectivityFormat::Headered`] the header records the resolved byte
/// order, so `Native` is written as the host's concrete order.
///
/// # Errors
/// [`crate::ConnectivityError::ConversionOverflow`] if an ID lies outside `±2^24`
/// and so cannot be stored in f32 without loss.
pub fn encode_connectivity(
    connectivity: &PairwiseConnectivity,
    format: ConnectivityFormat,
    byte_order: ByteOrder,
) -> Result<Vec<u8>> {
    // IDs go through f32 like the generation scripts write them
    let presynaptic = ids_to_floats(connectivity.presynaptic_ids(), Block::Presynaptic)?;
    let postsynaptic = ids_to_floats(connectivity.postsynaptic_ids(), Block::Postsynaptic)?;

    let n = connectivity.len();
    let (header, byte_order) = match format {
        ConnectivityFormat::Legacy => (None, byte_order),
        ConnectivityFormat::Headered => {
            let header = ConnectivityHeader::new(n, byte_order);
            (Some(header.encode()), header.byte_order)
        }
    };
    let header_len = if header.is_some() { HEADER_LEN } else { 0 };

    let mut out = vec![0u8; header_len + n * RECORD_BYTES];
    if let Some(header) = header {
        out[..HEADER_LEN].copy_from_slice(&header);
    }

    let mut offset = header_len;
    for values in [
        presynaptic.as_slice(),
        postsynaptic.as_slice(),
        connectivity.weights(),
        connectivity.delays(),
    ] {
        let end = offset + values.len() * VALUE_BYTES;
        byte_order.write_f32_into(values, &mut out[offset..end]);
        offset = end;
    }

    Ok(out)
}

/// Write connectivity to `path`, replacing any existing file
pub fn write_connectivity<P: AsRef<Path>>(
    connectivity: &PairwiseConnectivity,
    path: P,
    format: ConnectivityFormat,
    byte_order: ByteOrder,
) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_connectivity(connectivity, format, byte_order)?;

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;

    debug!(
        target: crate::LOG_TARGET,
        "Wrote {} synapses ({}, {} bytes) to {}",
        connectivity.len(),
        format,
        bytes.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_connectivity, ConnectivityError, DecodeOptions, FormatPolicy, MAX_EXACT_ID};
    use proptest::prelude::*;

    #[test]
    fn test_legacy_layout_is_block_ordered() {
        let connectivity =
            PairwiseConnectivity::new(vec![3], vec![4], vec![0.5], vec![2.0]).unwrap();
        let bytes = encode_connectivity(&connectivity, ConnectivityFormat::Legacy, ByteOrder::Little).unwrap();

        assert_eq!(bytes.len(), RECORD_BYTES);
        assert_eq!(&bytes[0..4], &3.0f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &4.0f32.to_le_bytes());
        assert_eq!(&bytes[8..12], &0.5f32.to_le_bytes());
        assert_eq!(&bytes[12..16], &2.0f32.to_le_bytes());
    }

    #[test]
    fn test_headered_layout_has_header() {
        let connectivity = PairwiseConnectivity::default();
        let bytes = encode_connectivity(&connectivity, ConnectivityFormat::Headered, ByteOrder::Native).unwrap();

        assert_eq!(bytes.len(), HEADER_LEN);
        let header = ConnectivityHeader::decode(&bytes).unwrap();
        assert_eq!(header.record_count, 0);
    }

    #[test]
    fn test_id_past_exact_bound_is_not_encoded() {
        let connectivity =
            PairwiseConnectivity::new(vec![0, 16_777_217], vec![1, 2], vec![0.5; 2], vec![1.0; 2])
                .unwrap();

        for format in [ConnectivityFormat::Legacy, ConnectivityFormat::Headered] {
            let result = encode_connectivity(&connectivity, format, ByteOrder::Native);
            assert!(matches!(
                result,
                Err(ConnectivityError::ConversionOverflow { block: Block::Presynaptic, index: 1, .. })
            ));
        }
    }

    #[test]
    fn test_unencodable_connectivity_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overflow.bin");
        let connectivity =
            PairwiseConnectivity::new(vec![0], vec![-20_000_000], vec![0.5], vec![1.0]).unwrap();

        let result = write_connectivity(&connectivity, &path, ConnectivityFormat::Legacy, ByteOrder::Native);

        assert!(matches!(
            result,
            Err(ConnectivityError::ConversionOverflow { block: Block::Postsynaptic, index: 0, .. })
        ));
        assert!(!path.exists());
    }

    fn byte_order_strategy() -> impl Strategy<Value = ByteOrder> {
        prop_oneof![
            Just(ByteOrder::Native),
            Just(ByteOrder::Little),
            Just(ByteOrder::Big),
        ]
    }

    fn connectivity_strategy() -> impl Strategy<Value = PairwiseConnectivity> {
        let bound = MAX_EXACT_ID as i32;
        (0usize..512).prop_flat_map(move |n| {
            (
                prop::collection::vec(-bound..=bound, n),
                prop::collection::vec(-bound..=bound, n),
                prop::collection::vec(any::<f32>(), n),
                prop::collection::vec(any::<f32>(), n),
            )
                .prop_map(|(pre, post, weights, delays)| {
                    PairwiseConnectivity::new(pre, post, weights, delays).unwrap()
                })
        })
    }

    fn bits(values: &[f32]) -> Vec<u32> {
        values.iter().map(|v| v.to_bits()).collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_encode_decode_preserves_every_value(
            connectivity in connectivity_strategy(),
            byte_order in byte_order_strategy(),
            headered in any::<bool>(),
        ) {
            let (format, policy) = if headered {
                (ConnectivityFormat::Headered, FormatPolicy::Headered)
            } else {
                (ConnectivityFormat::Legacy, FormatPolicy::Legacy)
            };
            let bytes = encode_connectivity(&connectivity, format, byte_order).unwrap();
            let options = DecodeOptions {
                format: policy,
                byte_order,
                ..DecodeOptions::default()
            };
            let decoded = decode_connectivity(&bytes, &options).unwrap();

            prop_assert_eq!(decoded.presynaptic_ids(), connectivity.presynaptic_ids());
            prop_assert_eq!(decoded.postsynaptic_ids(), connectivity.postsynaptic_ids());
            prop_assert_eq!(bits(decoded.weights()), bits(connectivity.weights()));
            prop_assert_eq!(bits(decoded.delays()), bits(connectivity.delays()));
        }
    }
}
