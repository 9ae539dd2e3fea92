//! Command-line arguments of the account service.
//!
//! Every flag is optional and, when given, wins over the file and environment
//! configuration.

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::{PolicyKind, ServiceConfig};

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct ServiceArgs {
    /// Path to a configuration file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for the HTTP API to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Strategy generator backing the service
    #[arg(long, value_enum)]
    policy: Option<PolicyKind>,

    /// Seed for the randomized strategy generator
    #[arg(long)]
    seed: Option<u64>,
}

impl ServiceArgs {
    /// Parses command-line arguments into a `ServiceArgs` struct.
    ///
    /// `--help` and `--version` are handled by `clap`, which exits the process.
    pub fn parse_args(args: Vec<String>) -> Self {
        ServiceArgs::parse_from(args)
    }

    pub fn get_config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Writes the flags that were given into `config`.
    pub fn apply_overrides(&self, config: &mut ServiceConfig) {
        if let Some(port) = self.port {
            config.server_port = port;
        }
        if let Some(policy) = self.policy {
            config.strategy.policy = policy;
        }
        if let Some(seed) = self.seed {
            config.strategy.seed = Some(seed);
        }
    }
}
