//! Strategy parameter bundles handed back to trading terminals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Writes whole amounts as JSON integers (`1000`, not `1000.0`).
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.fract() == 0.0 && amount.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

/// The risk and execution limits of a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskParameters {
    /// Profit (account currency) at which the strategy is considered done.
    #[serde(serialize_with = "serialize_amount")]
    pub target_profit: f64,
    /// Loss (account currency) at which trading must stop.
    #[serde(serialize_with = "serialize_amount")]
    pub max_loss: f64,
    /// Maximum tolerated round trip to the broker, in milliseconds.
    pub max_ping: u32,
    /// Maximum tolerated slippage, in points.
    pub max_slippage: u32,
    /// Stop loss distance, in pips.
    pub stop_loss: u32,
    /// Take profit distance, in pips.
    pub take_profit: u32,
    /// Position size in lots, when the generator prescribes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_size: Option<f64>,
}

/// A generated strategy, valid from `creation_timestamp` until `expiry_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDetails {
    pub creation_timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    /// Lifetime in seconds.
    pub validity: u64,
    pub expiry_date: DateTime<Utc>,
    #[serde(flatten)]
    pub parameters: RiskParameters,
}

impl StrategyDetails {
    /// Issues a strategy at `now` that expires `validity` seconds later.
    pub fn issue(
        kind: impl Into<String>,
        validity: u64,
        now: DateTime<Utc>,
        parameters: RiskParameters,
    ) -> Self {
        let expiry_date = i64::try_from(validity)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            creation_timestamp: now,
            kind: kind.into(),
            validity,
            expiry_date,
            parameters,
        }
    }

    pub fn get_kind(&self) -> &str {
        &self.kind
    }

    pub fn get_parameters(&self) -> &RiskParameters {
        &self.parameters
    }
}
