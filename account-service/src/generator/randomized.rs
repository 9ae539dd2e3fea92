//! Randomized strategy generation.
//!
//! Stands in for a call to an external language model: the strategy family
//! is drawn at random, every parameter is sampled from a family-specific
//! range, and the "call" takes `latency` and fails with `failure_rate`.

use std::ops::Range;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use account::prelude::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Strategy families the generator can pick from.
pub const STRATEGY_LABELS: [&str; 5] = ["reversal", "scalping", "breakout", "momentum", "news"];

/// Monetary ranges are expressed as fractions of this notional capital.
const CAPITAL_SCALE: f64 = 10_000.0;
const MAX_PING: Range<u32> = 100..300;
const MAX_SLIPPAGE: Range<u32> = 5..15;

struct LabelProfile {
    label: &'static str,
    target_profit: Range<f64>,
    max_loss: Range<f64>,
    stop_loss: Range<u32>,
    take_profit: Range<u32>,
    lot_size: f64,
    validity: u64,
}

static LABEL_PROFILES: [LabelProfile; 5] = [
    LabelProfile {
        label: "reversal",
        target_profit: 0.010..0.030,
        max_loss: 0.005..0.015,
        stop_loss: 20..50,
        take_profit: 40..100,
        lot_size: 0.10,
        validity: 86_400,
    },
    LabelProfile {
        label: "scalping",
        target_profit: 0.005..0.015,
        max_loss: 0.002..0.012,
        stop_loss: 10..30,
        take_profit: 15..45,
        lot_size: 0.05,
        validity: 3_600,
    },
    LabelProfile {
        label: "breakout",
        target_profit: 0.015..0.040,
        max_loss: 0.005..0.020,
        stop_loss: 15..40,
        take_profit: 30..90,
        lot_size: 0.10,
        validity: 43_200,
    },
    LabelProfile {
        label: "momentum",
        target_profit: 0.020..0.050,
        max_loss: 0.010..0.025,
        stop_loss: 25..60,
        take_profit: 50..150,
        lot_size: 0.15,
        validity: 604_800,
    },
    LabelProfile {
        label: "news",
        target_profit: 0.010..0.050,
        max_loss: 0.010..0.030,
        stop_loss: 30..80,
        take_profit: 60..200,
        lot_size: 0.02,
        validity: 1_800,
    },
];

fn label_profile(label: &str) -> Option<&'static LabelProfile> {
    LABEL_PROFILES.iter().find(|profile| profile.label == label)
}

/// Renders the instruction a real model would receive for this account.
pub fn build_prompt(request: &GenerationRequest<'_>, label: &str) -> String {
    let profile = request.profile;
    let describe = |value: &Option<serde_json::Value>| {
        value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    };

    format!(
        "Generate a {label} trading strategy for account {account} \
         (declared goal: {goal}; type: {kind}; currency: {currency}; leverage: {leverage}; \
         max loss: {max_loss}). Answer with targetProfit, maxLoss, maxPing, maxSlippage, \
         stopLoss, takeProfit and lotSize.",
        label = label,
        account = request.account_number,
        goal = profile.get_strategy_type(),
        kind = describe(&profile.account_type),
        currency = describe(&profile.account_currency),
        leverage = describe(&profile.leverage),
        max_loss = describe(&profile.max_loss),
    )
}

pub struct RandomizedGenerator {
    rng: Mutex<StdRng>,
    latency: Duration,
    failure_rate: f64,
}

impl RandomizedGenerator {
    /// Creates a generator with no latency and no failures. Seeded from the
    /// OS when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            latency: Duration::ZERO,
            failure_rate: 0.0,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Probability of a simulated failure, clamped to [0, 1].
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        self
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Draws a strategy family uniformly.
    pub fn pick_label(&self) -> &'static str {
        let index = self.rng().gen_range(0..STRATEGY_LABELS.len());
        STRATEGY_LABELS[index]
    }

    /// Samples a strategy of family `label`, issued at `now`.
    pub fn sample(&self, label: &str, now: DateTime<Utc>) -> Result<StrategyDetails, GenerationError> {
        let profile =
            label_profile(label).ok_or_else(|| GenerationError::UnknownLabel(label.to_string()))?;
        let mut rng = self.rng();

        let parameters = RiskParameters {
            target_profit: rng.gen_range(profile.target_profit.clone()) * CAPITAL_SCALE,
            max_loss: rng.gen_range(profile.max_loss.clone()) * CAPITAL_SCALE,
            max_ping: rng.gen_range(MAX_PING),
            max_slippage: rng.gen_range(MAX_SLIPPAGE),
            stop_loss: rng.gen_range(profile.stop_loss.clone()),
            take_profit: rng.gen_range(profile.take_profit.clone()),
            lot_size: Some(profile.lot_size),
        };

        Ok(StrategyDetails::issue(profile.label, profile.validity, now, parameters))
    }

    fn call_fails(&self) -> bool {
        self.failure_rate > 0.0 && self.rng().gen_bool(self.failure_rate)
    }
}

#[async_trait]
impl StrategyGenerator for RandomizedGenerator {
    fn name(&self) -> &str {
        "randomized"
    }

    async fn generate(
        &self,
        request: GenerationRequest<'_>,
    ) -> Result<StrategyDetails, GenerationError> {
        let label = self.pick_label();
        debug!("Prompt: {}", build_prompt(&request, label));

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.call_fails() {
            warn!(
                "Simulated generation failure for account {}",
                request.account_number
            );
            return Err(GenerationError::Unavailable(format!(
                "no answer for account {}",
                request.account_number
            )));
        }

        self.sample(label, Utc::now())
    }
}
