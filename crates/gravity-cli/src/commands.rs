//! Subcommand implementations. Each returns its report as text so the
//! binary only has to print it.

use anyhow::{anyhow, bail, Context, Result};
use gravity_consensus::{
    block_proof, check_proof_of_work, decode_compact, encode_compact, legacy_next_work_required,
    next_work_required,
};
use gravity_core::{ChainSnapshot, ConsensusParams, Hash32, HASH32_LEN};
use log::info;
use num_bigint::BigUint;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const LOG_TARGET: &str = "gravity::cli";

/// Parse compact bits written as hex, with or without `0x`.
pub fn parse_bits(s: &str) -> Result<u32, String> {
    let digits = s.trim().trim_start_matches("0x");
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid compact bits {s:?}: {e}"))
}

/// Parse a 256-bit target written as hex, with or without `0x`.
pub fn parse_target(s: &str) -> Result<BigUint> {
    let digits = s.trim().trim_start_matches("0x");
    if digits.is_empty() || digits.len() > HASH32_LEN * 2 {
        bail!("target must be 1 to 64 hex digits, got {}", digits.len());
    }
    BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| anyhow!("invalid hex target {s:?}"))
}

/// Read a JSON chain snapshot.
pub fn load_chain(path: &Path) -> Result<ChainSnapshot> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading chain snapshot {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("parsing chain snapshot {}", path.display()))
}

/// `decode-bits`: show the target and flags encoded in `bits`.
pub fn decode_bits(bits: u32) -> String {
    let decoded = decode_compact(bits);
    let mut out = String::new();
    let _ = writeln!(out, "bits      0x{bits:08x}");
    let _ = writeln!(out, "target    {:064x}", decoded.target);
    let _ = writeln!(out, "negative  {}", decoded.negative);
    let _ = writeln!(out, "overflow  {}", decoded.overflow);
    let _ = writeln!(out, "valid     {}", decoded.is_valid());
    if let Ok(work) = block_proof(bits) {
        let _ = writeln!(out, "work      {work}");
    }
    out
}

/// `encode-target`: normalized compact form of a hex target.
pub fn encode_target(target: &str) -> Result<String> {
    let target = parse_target(target)?;
    Ok(format!("0x{:08x}", encode_compact(&target)))
}

/// `next-bits`: compact target required of the block after `height`
/// (default: the snapshot tip).
///
/// `candidate_time` defaults to one target spacing after that block.
pub fn next_bits(
    chain: &ChainSnapshot,
    height: Option<u32>,
    candidate_time: Option<i64>,
    legacy: bool,
    params: &ConsensusParams,
) -> Result<u32> {
    let last = match height {
        Some(h) => chain
            .get(h)
            .ok_or_else(|| anyhow!("height {h} is not in the snapshot"))?,
        None => chain.tip().ok_or_else(|| anyhow!("chain snapshot is empty"))?,
    };
    let bits = if legacy {
        legacy_next_work_required(chain, last, params)
    } else {
        let candidate_time =
            candidate_time.unwrap_or_else(|| last.time.saturating_add(params.pow_target_spacing));
        next_work_required(chain, Some(last), candidate_time, params)
    };
    info!(target: LOG_TARGET,
        "next bits after height {} ({}): {bits:08x}",
        last.height,
        if legacy { "legacy" } else { "adaptive" }
    );
    Ok(bits)
}

/// `check-pow`: whether `hash` satisfies `bits`.
///
/// With `little_endian` the hash is taken in reversed byte order.
pub fn check_pow(
    hash: &str,
    bits: u32,
    little_endian: bool,
    params: &ConsensusParams,
) -> Result<bool> {
    let mut hash: Hash32 = hash.trim().parse().context("parsing hash")?;
    if little_endian {
        hash = Hash32::from_le_bytes(hash.0);
    }
    Ok(check_proof_of_work(&hash, bits, params))
}
