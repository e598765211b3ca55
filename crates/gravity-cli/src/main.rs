#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

use commands::parse_bits;
use config::{resolve_params, ParamsArgs};

/// Inspect compact targets and replay difficulty retargets.
#[derive(Parser, Debug)]
#[command(name = "gravity", version)]
struct Cli {
    #[command(flatten)]
    params: ParamsArgs,
    /// Log every retarget step
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode compact bits into a target
    DecodeBits {
        /// Compact bits in hex
        #[arg(value_parser = parse_bits)]
        bits: u32,
    },
    /// Encode a hex target into compact bits
    EncodeTarget {
        /// Target in hex, at most 64 digits
        target: String,
    },
    /// Compute the bits required of the next block over a JSON chain snapshot
    NextBits {
        /// Snapshot file: {"blocks":[{"height","time","bits"}, ...]}
        #[arg(long = "chain")]
        chain: PathBuf,
        /// Start from this height instead of the snapshot tip
        #[arg(long = "height")]
        height: Option<u32>,
        /// Candidate block timestamp (default: one spacing after the start block)
        #[arg(long = "time")]
        time: Option<i64>,
        /// Use the legacy full-window linear retarget
        #[arg(long = "legacy")]
        legacy: bool,
    },
    /// Check a hash against compact bits
    CheckPow {
        /// 32-byte hash in hex
        #[arg(long = "hash")]
        hash: String,
        /// Compact bits in hex
        #[arg(long = "bits", value_parser = parse_bits)]
        bits: u32,
        /// Hash bytes are in little-endian order
        #[arg(long = "little-endian")]
        little_endian: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module(
            "gravity",
            if cli.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        )
        .parse_default_env()
        .init();

    let params = resolve_params(cli.params)?;

    match cli.command {
        Command::DecodeBits { bits } => print!("{}", commands::decode_bits(bits)),
        Command::EncodeTarget { target } => println!("{}", commands::encode_target(&target)?),
        Command::NextBits {
            chain,
            height,
            time,
            legacy,
        } => {
            let snapshot = commands::load_chain(&chain)?;
            let bits = commands::next_bits(&snapshot, height, time, legacy, &params)?;
            println!("0x{bits:08x}");
        }
        Command::CheckPow {
            hash,
            bits,
            little_endian,
        } => {
            let valid = commands::check_pow(&hash, bits, little_endian, &params)?;
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
