//! Fixed strategy catalog keyed by the client's declared strategy label.

use account::prelude::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub const SHORT_TERM_GAIN: &str = "short term gain";
pub const LONG_TERM_GAIN: &str = "long term gain";

const ONE_HOUR: u64 = 3600;
const THIRTY_DAYS: u64 = 86400 * 30;

/// Looks up the catalog entry for `label`, issued at `now`.
///
/// Unknown labels get the default entry. Every catalog strategy is a
/// scalping strategy without a prescribed lot size.
pub fn determine_strategy_details(label: &str, now: DateTime<Utc>) -> StrategyDetails {
    let (validity, parameters) = match label {
        SHORT_TERM_GAIN => (
            ONE_HOUR,
            RiskParameters {
                target_profit: 1000.0,
                max_loss: 500.0,
                max_ping: 100,
                max_slippage: 10,
                stop_loss: 15,
                take_profit: 50,
                lot_size: None,
            },
        ),
        LONG_TERM_GAIN => (
            THIRTY_DAYS,
            RiskParameters {
                target_profit: 5000.0,
                max_loss: 2000.0,
                max_ping: 200,
                max_slippage: 20,
                stop_loss: 30,
                take_profit: 100,
                lot_size: None,
            },
        ),
        _ => (
            THIRTY_DAYS,
            RiskParameters {
                target_profit: 500.0,
                max_loss: 200.0,
                max_ping: 150,
                max_slippage: 15,
                stop_loss: 10,
                take_profit: 25,
                lot_size: None,
            },
        ),
    };

    StrategyDetails::issue("scalping", validity, now, parameters)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogGenerator;

impl CatalogGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StrategyGenerator for CatalogGenerator {
    fn name(&self) -> &str {
        "catalog"
    }

    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<StrategyDetails, GenerationError> {
        Ok(determine_strategy_details(
            request.profile.get_strategy_type(),
            Utc::now(),
        ))
    }
}
