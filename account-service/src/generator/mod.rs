//! Strategy generation policies.
//!
//! - `catalog`: fixed table keyed by the client's declared label.
//! - `randomized`: random family and parameters, simulating an external model.

pub mod catalog;
pub mod randomized;

use std::sync::Arc;
use std::time::Duration;

use account::StrategyGenerator;

pub use catalog::{determine_strategy_details, CatalogGenerator};
pub use randomized::RandomizedGenerator;

use crate::config::{PolicyKind, StrategyConfig};

/// Builds the generator selected by `config`.
pub fn build_generator(config: &StrategyConfig) -> Arc<dyn StrategyGenerator> {
    match config.policy {
        PolicyKind::Catalog => Arc::new(CatalogGenerator::new()),
        PolicyKind::Randomized => Arc::new(
            RandomizedGenerator::new(config.seed)
                .with_latency(Duration::from_millis(config.latency_ms))
                .with_failure_rate(config.failure_rate),
        ),
    }
}
