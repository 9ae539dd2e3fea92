//! Dynamic account metrics reported between syncs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live account figures as reported by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccountMetrics {
    pub balance: f64,
    pub equity: f64,
    pub margin: f64,
    pub free_margin: f64,
    pub margin_level: f64,
    pub profit: f64,
}

impl AccountMetrics {
    /// Wire names of every metric, in reporting order.
    pub const FIELDS: [&'static str; 6] = [
        "balance",
        "equity",
        "margin",
        "free_margin",
        "margin_level",
        "profit",
    ];

    /// Builds metrics from values ordered as [`AccountMetrics::FIELDS`].
    pub fn from_ordered(values: [f64; 6]) -> Self {
        let [balance, equity, margin, free_margin, margin_level, profit] = values;
        Self {
            balance,
            equity,
            margin,
            free_margin,
            margin_level,
            profit,
        }
    }
}

/// A timestamped metric snapshot stored on the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountUpdate {
    /// Server receive time.
    pub time: DateTime<Utc>,
    #[serde(flatten)]
    pub metrics: AccountMetrics,
}

impl AccountUpdate {
    pub fn new(time: DateTime<Utc>, metrics: AccountMetrics) -> Self {
        Self { time, metrics }
    }
}
