// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for loading pairwise connectivity files into an engine.
//!
//! Fixtures are written the way external generation scripts write them: four
//! native-endian f32 blocks with no header.

use spikewire::config::{ConnectivityConfig, FormatSetting};
use spikewire::connectivity::{
    encode_connectivity, write_connectivity, Block, ByteOrder, ConnectivityError,
    ConnectivityFormat, ConnectivityType, IdConversion, MAX_EXACT_ID, RECORD_BYTES,
};
use spikewire::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_blocks(dir: &TempDir, name: &str, blocks: [&[f32]; 4]) -> PathBuf {
    let path = dir.path().join(name);
    let bytes: Vec<u8> = blocks
        .iter()
        .flat_map(|block| block.iter().flat_map(|v| v.to_ne_bytes()))
        .collect();
    fs::write(&path, bytes).unwrap();
    path
}

fn engine_with_layers() -> (InMemorySynapseRegistry, LayerId, LayerId) {
    let mut engine = InMemorySynapseRegistry::new();
    let a = engine.add_layer(3);
    let b = engine.add_layer(3);
    (engine, a, b)
}

fn sample(n: usize) -> PairwiseConnectivity {
    PairwiseConnectivity::new(
        (0..n).map(|i| (i % 1000) as i32).collect(),
        (0..n).map(|i| ((i * 7) % 1000) as i32).collect(),
        (0..n).map(|i| (i as f32).sin()).collect(),
        (0..n).map(|i| 0.1 + (i % 20) as f32 * 0.1).collect(),
    )
    .unwrap()
}

fn load(path: &Path, engine: &mut InMemorySynapseRegistry, a: LayerId, b: LayerId) -> Result<LoadReport, ConnectivityError> {
    load_and_connect(a, b, SynapseGroupParams::default(), path, engine)
}

#[test]
fn test_three_record_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write_blocks(
        &dir,
        "scenario.bin",
        [
            &[0.0, 1.0, 2.0],
            &[1.0, 2.0, 0.0],
            &[0.1, 0.2, 0.3],
            &[1.0, 1.0, 1.0],
        ],
    );
    assert_eq!(fs::metadata(&path).unwrap().len(), 48);

    let (mut engine, a, b) = engine_with_layers();
    let report = load(&path, &mut engine, a, b).unwrap();

    assert_eq!(report.record_count, 3);
    assert_eq!(engine.synapse_group_count(), 1);

    let group = engine.group(report.group_id).unwrap();
    assert_eq!(group.pre_layer, a);
    assert_eq!(group.post_layer, b);
    assert_eq!(group.params.connectivity_type, ConnectivityType::Pairwise);
    assert_eq!(group.params.pairwise_connect_presynaptic, vec![0, 1, 2]);
    assert_eq!(group.params.pairwise_connect_postsynaptic, vec![1, 2, 0]);
    assert_eq!(group.params.pairwise_connect_weight, vec![0.1, 0.2, 0.3]);
    assert_eq!(group.params.pairwise_connect_delay, vec![1.0, 1.0, 1.0]);
}

#[test]
fn test_round_trip_preserves_order() {
    let dir = TempDir::new().unwrap();
    let original = sample(257);
    let path = dir.path().join("round_trip.bin");
    fs::write(
        &path,
        encode_connectivity(&original, ConnectivityFormat::Legacy, ByteOrder::Native).unwrap(),
    )
    .unwrap();

    let mut engine = InMemorySynapseRegistry::new();
    let a = engine.add_layer(1000);
    let b = engine.add_layer(1000);
    let report = load(&path, &mut engine, a, b).unwrap();

    let params = &engine.group(report.group_id).unwrap().params;
    assert_eq!(params.pairwise_connect_presynaptic, original.presynaptic_ids());
    assert_eq!(params.pairwise_connect_postsynaptic, original.postsynaptic_ids());
    assert_eq!(params.pairwise_connect_weight, original.weights());
    assert_eq!(params.pairwise_connect_delay, original.delays());
}

fn bits(values: &[f32]) -> Vec<u32> {
    values.iter().map(|v| v.to_bits()).collect()
}

#[test]
fn test_boundary_ids_and_special_floats_survive_file() {
    let dir = TempDir::new().unwrap();
    let bound = MAX_EXACT_ID as i32;
    let original = PairwiseConnectivity::new(
        vec![-bound, bound, -1, 0, 7],
        vec![bound, -bound, 0, -7, 1],
        vec![f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -0.0, f32::MIN_POSITIVE / 4.0],
        vec![f32::MAX, f32::MIN, 0.0, f32::EPSILON, -1.5],
    )
    .unwrap();
    let path = dir.path().join("boundary.bin");
    write_connectivity(&original, &path, ConnectivityFormat::Legacy, ByteOrder::Native).unwrap();

    let (mut engine, a, b) = engine_with_layers();
    let report = load(&path, &mut engine, a, b).unwrap();

    let params = &engine.group(report.group_id).unwrap().params;
    assert_eq!(params.pairwise_connect_presynaptic, original.presynaptic_ids());
    assert_eq!(params.pairwise_connect_postsynaptic, original.postsynaptic_ids());
    assert_eq!(bits(&params.pairwise_connect_weight), bits(original.weights()));
    assert_eq!(bits(&params.pairwise_connect_delay), bits(original.delays()));
}

#[test]
fn test_unrepresentable_id_is_never_written() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("too_large.bin");
    let connectivity =
        PairwiseConnectivity::new(vec![16_777_217], vec![0], vec![0.5], vec![1.0]).unwrap();

    let result = write_connectivity(&connectivity, &path, ConnectivityFormat::Legacy, ByteOrder::Native);

    assert!(matches!(
        result,
        Err(ConnectivityError::ConversionOverflow { block: Block::Presynaptic, index: 0, .. })
    ));
    assert!(!path.exists());
}

#[test]
fn test_count_inference() {
    let dir = TempDir::new().unwrap();
    let mut engine = InMemorySynapseRegistry::new();
    let a = engine.add_layer(1000);
    let b = engine.add_layer(1000);

    for n in [0usize, 1, 10, 10_000] {
        let path = dir.path().join(format!("n{}.bin", n));
        fs::write(
            &path,
            encode_connectivity(&sample(n), ConnectivityFormat::Legacy, ByteOrder::Native).unwrap(),
        )
        .unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), (n * RECORD_BYTES) as u64);

        let report = load(&path, &mut engine, a, b).unwrap();
        assert_eq!(report.record_count, n, "N = {}", n);
        assert_eq!(engine.group(report.group_id).unwrap().params.pairwise_len(), n);
    }
    assert_eq!(engine.synapse_group_count(), 4);
    assert_eq!(engine.total_synapses(), 10_011);
}

#[test]
fn test_empty_file_yields_empty_group() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.bin");
    fs::write(&path, b"").unwrap();

    let (mut engine, a, b) = engine_with_layers();
    let report = load(&path, &mut engine, a, b).unwrap();

    assert_eq!(report.record_count, 0);
    assert_eq!(engine.synapse_group_count(), 1);
    assert_eq!(engine.total_synapses(), 0);
}

#[test]
fn test_open_failure_leaves_engine_untouched() {
    let dir = TempDir::new().unwrap();
    let (mut engine, a, b) = engine_with_layers();

    let result = load(&dir.path().join("does_not_exist.bin"), &mut engine, a, b);

    match result {
        Err(ConnectivityError::OpenFailure { path, .. }) => {
            assert!(path.ends_with("does_not_exist.bin"));
        }
        other => panic!("expected OpenFailure, got {:?}", other),
    }
    assert_eq!(engine.synapse_group_count(), 0);
}

#[test]
fn test_truncated_file_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("truncated.bin");
    let mut bytes = encode_connectivity(&sample(5), ConnectivityFormat::Legacy, ByteOrder::Native).unwrap();
    bytes.pop();
    assert_eq!(bytes.len(), 16 * 5 - 1);
    fs::write(&path, bytes).unwrap();

    let (mut engine, a, b) = engine_with_layers();
    let result = load(&path, &mut engine, a, b);

    assert!(matches!(
        result,
        Err(ConnectivityError::SizeMismatch { len: 79, record_bytes: 16, remainder: 15 })
    ));
    assert_eq!(engine.synapse_group_count(), 0);
}

#[test]
fn test_fractional_id_rejected_unless_truncating() {
    let dir = TempDir::new().unwrap();
    let path = write_blocks(&dir, "fractional.bin", [&[0.0, 1.7], &[2.0, 0.0], &[0.5, 0.5], &[1.0, 1.0]]);
    let (mut engine, a, b) = engine_with_layers();

    let strict = load(&path, &mut engine, a, b);
    assert!(matches!(
        strict,
        Err(ConnectivityError::FractionalId { block: Block::Presynaptic, index: 1, .. })
    ));
    assert_eq!(engine.synapse_group_count(), 0);

    let config = ConnectivityConfig {
        strict_ids: false,
        ..ConnectivityConfig::default()
    };
    let loader = ConnectivityLoader::from_config(&config);
    assert_eq!(loader.options().decode.id_conversion, IdConversion::Truncate);

    let report = loader
        .load_and_connect(a, b, SynapseGroupParams::default(), &path, &mut engine)
        .unwrap();
    let params = &engine.group(report.group_id).unwrap().params;
    assert_eq!(params.pairwise_connect_presynaptic, vec![0, 1]);
}

#[test]
fn test_headered_file_through_auto_config() {
    let dir = TempDir::new().unwrap();
    let original = sample(12);
    let path = dir.path().join("headered.bin");
    fs::write(
        &path,
        encode_connectivity(&original, ConnectivityFormat::Headered, ByteOrder::Big).unwrap(),
    )
    .unwrap();

    let mut engine = InMemorySynapseRegistry::new();
    let a = engine.add_layer(1000);
    let b = engine.add_layer(1000);

    // Legacy policy sees 24 stray header bytes: not a whole number of records
    let legacy = load(&path, &mut engine, a, b);
    assert!(matches!(legacy, Err(ConnectivityError::SizeMismatch { .. })));

    let config = ConnectivityConfig {
        format: FormatSetting::Auto,
        ..ConnectivityConfig::default()
    };
    let report = ConnectivityLoader::from_config(&config)
        .load_and_connect(a, b, SynapseGroupParams::default().with_label("auto"), &path, &mut engine)
        .unwrap();

    assert_eq!(report.format, ConnectivityFormat::Headered);
    let group = engine.group(report.group_id).unwrap();
    assert_eq!(group.params.label.as_deref(), Some("auto"));
    assert_eq!(group.params.pairwise_connect_weight, original.weights());
}
