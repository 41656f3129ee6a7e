// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connectivity File Tool

Inspects connectivity files and upgrades headerless (legacy) files to the
headered format.

Usage:
  cargo run --bin spikewire-connectivity-tool -- inspect <file> [options]
  cargo run --bin spikewire-connectivity-tool -- upgrade <input> <output> [options]

Options:
  --config <path>                     Configuration file (default: search for spikewire.toml)
  --format legacy|headered|auto       Input format
  --byte-order native|little|big      Byte order of headerless input
  --truncate-ids                      Truncate fractional IDs instead of rejecting them
  --debug-<crate> / --debug-all       Debug logging
*/

use anyhow::{bail, Context, Result};
use spikewire::config::{self, SpikewireConfig};
use spikewire::connectivity::{
    read_connectivity, write_connectivity, ByteOrder, ConnectivityFormat, LoaderOptions,
    PairwiseConnectivity, ReadSummary,
};
use spikewire::observability::{debug_flags_help, init_logging, parse_debug_flags};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use tracing::info;

struct Args {
    command: String,
    positional: Vec<String>,
    config_path: Option<PathBuf>,
    overrides: HashMap<String, String>,
}

fn parse_args() -> Result<Args> {
    let mut raw = env::args().skip(1);
    let mut command = None;
    let mut positional = Vec::new();
    let mut config_path = None;
    let mut overrides = HashMap::new();

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(PathBuf::from(raw.next().context("--config needs a path")?));
            }
            "--format" => {
                overrides.insert("format".to_string(), raw.next().context("--format needs a value")?);
            }
            "--byte-order" => {
                overrides.insert(
                    "byte_order".to_string(),
                    raw.next().context("--byte-order needs a value")?,
                );
            }
            "--truncate-ids" => {
                overrides.insert("strict_ids".to_string(), "false".to_string());
            }
            debug if debug.starts_with("--debug-") => {}
            other if other.starts_with("--") => bail!("Unknown option {}", other),
            _ if command.is_none() => command = Some(arg),
            _ => positional.push(arg),
        }
    }

    Ok(Args {
        command: command.unwrap_or_default(),
        positional,
        config_path,
        overrides,
    })
}

fn load_tool_config(args: &Args) -> Result<SpikewireConfig> {
    let config = config::load_config_or_default(args.config_path.as_deref(), Some(&args.overrides))
        .context("Failed to load configuration")?;
    config::validate_config(&config)?;
    Ok(config)
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  spikewire-connectivity-tool inspect <file> [options]");
    eprintln!("  spikewire-connectivity-tool upgrade <input> <output> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>");
    eprintln!("  --format legacy|headered|auto");
    eprintln!("  --byte-order native|little|big");
    eprintln!("  --truncate-ids");
    eprintln!();
    eprintln!("{}", debug_flags_help());
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let config = load_tool_config(&args)?;
    let _logging = init_logging(&config.logging, &parse_debug_flags())?;
    let options = LoaderOptions::from(&config.connectivity);
    info!(
        target: "spikewire",
        "Connectivity tool v{} ({:?}, {:?})",
        spikewire::VERSION,
        options.decode.format,
        options.decode.byte_order
    );

    match (args.command.as_str(), args.positional.as_slice()) {
        ("inspect", [input]) => inspect(input, &options),
        ("upgrade", [input, output]) => upgrade(input, output, &options),
        _ => {
            print_usage();
            bail!("Expected `inspect <file>` or `upgrade <input> <output>`");
        }
    }
}

fn inspect(input: &str, options: &LoaderOptions) -> Result<()> {
    let (connectivity, summary) = read_connectivity(input, options)?;

    println!("Connectivity File");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    print_summary(&summary);
    if connectivity.is_empty() {
        println!("   (no synapses)");
        return Ok(());
    }
    print_statistics(&connectivity);
    Ok(())
}

fn upgrade(input: &str, output: &str, options: &LoaderOptions) -> Result<()> {
    let (connectivity, summary) = read_connectivity(input, options)?;
    if summary.format == ConnectivityFormat::Headered {
        println!("{} is already headered, rewriting anyway", input);
    }

    write_connectivity(&connectivity, output, ConnectivityFormat::Headered, ByteOrder::Little)
        .with_context(|| format!("Failed to write {}", output))?;

    println!(
        "Upgraded {} ({} synapses, {}) -> {} (headered, little-endian)",
        input, summary.record_count, summary.format, output
    );
    Ok(())
}

fn print_summary(summary: &ReadSummary) {
    println!("   Path:        {}", summary.path.display());
    println!("   Format:      {}", summary.format);
    if summary.byte_order_unverified {
        println!("   Byte order:  {:?} (assumed, file has no header)", summary.byte_order);
    } else {
        println!("   Byte order:  {:?}", summary.byte_order);
    }
    println!("   File bytes:  {}", summary.file_bytes);
    println!("   Synapses:    {}", summary.record_count);
}

fn print_statistics(connectivity: &PairwiseConnectivity) {
    println!();
    print_id_range("Pre IDs", connectivity.presynaptic_ids());
    print_id_range("Post IDs", connectivity.postsynaptic_ids());
    print_float_stats("Weights", connectivity.weights());
    print_float_stats("Delays", connectivity.delays());
}

fn print_id_range(label: &str, ids: &[i32]) {
    let min = ids.iter().min().copied().unwrap_or_default();
    let max = ids.iter().max().copied().unwrap_or_default();
    println!("   {:<12} {} .. {}", format!("{}:", label), min, max);
}

fn print_float_stats(label: &str, values: &[f32]) {
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64;
    println!(
        "   {:<12} min {:.6}  max {:.6}  mean {:.6}",
        format!("{}:", label),
        min,
        max,
        mean
    );
}
