//! Consensus parameters resolved from CLI/env/defaults.

use anyhow::{Context, Result};
use clap::Args;
use gravity_core::{ConsensusParams, Network, ReliefCurve, RetargetRegime};
use log::{debug, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "gravity::config";

/// Flags selecting the parameter set. Each falls back to a `GRAVITY_*`
/// environment variable.
#[derive(Args, Debug, Default, Clone)]
pub struct ParamsArgs {
    /// Network preset: mainnet, testnet or regtest [env: GRAVITY_NETWORK]
    #[arg(long = "network", global = true)]
    pub network: Option<String>,
    /// JSON parameter file; replaces the network preset [env: GRAVITY_PARAMS]
    #[arg(long = "params", global = true)]
    pub params: Option<PathBuf>,
    /// Window/long-gap regime: four-block, four-block-long-gap or twenty-block [env: GRAVITY_REGIME]
    #[arg(long = "regime", global = true)]
    pub regime: Option<String>,
    /// Relief curve: exact or legacy_float [env: GRAVITY_RELIEF_CURVE]
    #[arg(long = "relief-curve", global = true)]
    pub relief_curve: Option<String>,
}

/// Resolve parameters from flags, then the process environment, then the
/// mainnet preset.
pub fn resolve_params(cli: ParamsArgs) -> Result<ConsensusParams> {
    resolve_params_with(cli, |key| env::var(key).ok())
}

/// [`resolve_params`] with an explicit environment lookup.
pub fn resolve_params_with<F>(cli: ParamsArgs, lookup: F) -> Result<ConsensusParams>
where
    F: Fn(&str) -> Option<String>,
{
    let network = cli.network.or_else(|| lookup("GRAVITY_NETWORK"));
    let params_file = cli
        .params
        .or_else(|| lookup("GRAVITY_PARAMS").map(PathBuf::from));

    let mut params = match params_file {
        Some(path) => {
            if let Some(network) = &network {
                warn!(target: LOG_TARGET,
                    "ignoring network {network}: parameters come from {}",
                    path.display()
                );
            }
            load_params(&path)?
        }
        None => {
            let network: Network = network
                .unwrap_or_else(|| "mainnet".to_string())
                .parse()?;
            ConsensusParams::for_network(network)
        }
    };

    if let Some(regime) = cli.regime.or_else(|| lookup("GRAVITY_REGIME")) {
        let regime: RetargetRegime = regime.parse()?;
        params = params.with_regime(regime);
    }
    if let Some(curve) = cli.relief_curve.or_else(|| lookup("GRAVITY_RELIEF_CURVE")) {
        let curve: ReliefCurve = curve.parse()?;
        params = params.with_relief_curve(curve);
    }

    params
        .validate()
        .context("invalid consensus parameters")?;
    debug!(target: LOG_TARGET,
        "window {}..{} gap {}s/{}s curve {} limit {:064x}",
        params.past_blocks_min,
        params.past_blocks_max,
        params.long_gap_threshold,
        params.long_gap_step,
        params.relief_curve,
        params.pow_limit
    );
    Ok(params)
}

/// Read a JSON parameter file.
pub fn load_params(path: &Path) -> Result<ConsensusParams> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading parameter file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("parsing parameter file {}", path.display()))
}
