//! Service configuration.
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional file (TOML, JSON, YAML... picked by extension), then environment
//! variables such as `ACCOUNT_REGISTRY__SERVER_PORT=8080` or
//! `ACCOUNT_REGISTRY__STRATEGY__POLICY=randomized`.

use std::path::Path;

use ::config::{Config, Environment, File};
use account::SyncMode;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

const ENV_PREFIX: &str = "ACCOUNT_REGISTRY";

/// Which strategy generator backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Fixed parameter table keyed by the client's strategy label.
    #[default]
    Catalog,
    /// Randomized parameters simulating a call to an external model.
    Randomized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub policy: PolicyKind,
    /// Seed for the randomized generator. Entropy-seeded when absent.
    pub seed: Option<u64>,
    /// Simulated round trip of the randomized generator.
    pub latency_ms: u64,
    /// Probability (0.0 to 1.0) that a randomized generation call fails.
    pub failure_rate: f64,
    /// Generate a new strategy on every dynamic update. Defaults by policy.
    pub regenerate_on_update: Option<bool>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Catalog,
            seed: None,
            latency_ms: 250,
            failure_rate: 0.0,
            regenerate_on_update: None,
        }
    }
}

impl StrategyConfig {
    /// The catalog service copies a fixed allowlist; the randomized one keeps
    /// whatever the client sends.
    pub fn sync_mode(&self) -> SyncMode {
        match self.policy {
            PolicyKind::Catalog => SyncMode::Replace,
            PolicyKind::Randomized => SyncMode::Merge,
        }
    }

    pub fn regenerates_on_update(&self) -> bool {
        self.regenerate_on_update
            .unwrap_or(self.policy == PolicyKind::Randomized)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Accept `0` for dynamic metrics. When off, a zero metric is rejected as
    /// if it were missing.
    pub allow_zero_metrics: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub server_port: u16,
    pub bind_address: String,
    pub log_level: String,
    pub strategy: StrategyConfig,
    pub validation: ValidationConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server_port: 5000,
            bind_address: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
            strategy: StrategyConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Loads the configuration, merging `path` (if any) and the environment
    /// over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&ServiceConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: ServiceConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let rate = self.strategy.failure_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ServiceError::InvalidConfig(format!(
                "strategy.failure_rate must be within [0, 1], got {}",
                rate
            )));
        }
        if self.bind_address.trim().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "bind_address must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.server_port)
    }
}
