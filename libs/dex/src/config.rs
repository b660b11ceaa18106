//! Engine configuration.
//!
//! The one tunable the engine exposes is the pool fee ratio; observed
//! deployments disagree on its value (0.1% vs 0.3%), so it is configuration
//! rather than a constant. Loads from an optional TOML file with `BASIN_`
//! environment-variable overrides.

use crate::error::DexError;
use anyhow::{Context, Result};
use basin_amm::SwapFee;
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DexConfig {
    /// Retained fraction of each swap input, numerator.
    pub fee_numerator: u64,
    /// Retained fraction of each swap input, denominator.
    pub fee_denominator: u64,
}

impl Default for DexConfig {
    fn default() -> Self {
        DexConfig {
            fee_numerator: SwapFee::DEFAULT_NUMERATOR,
            fee_denominator: SwapFee::DEFAULT_DENOMINATOR,
        }
    }
}

impl DexConfig {
    /// Validate and convert the configured ratio into a [`SwapFee`].
    pub fn swap_fee(&self) -> Result<SwapFee, DexError> {
        Ok(SwapFee::new(self.fee_numerator, self.fee_denominator)?)
    }

    /// Load configuration from an optional TOML file, then apply
    /// `BASIN_`-prefixed environment variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!("loading dex config from {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix("BASIN").try_parsing(true));

        let config = builder.build().context("Failed to build configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
