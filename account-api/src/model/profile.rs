//! Static account profile, as pushed by the trading terminal on every sync.
//!
//! The scalar fields are opaque to the registry: whatever JSON value the
//! client sent is stored and echoed back verbatim.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// How an incoming profile is folded into the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Overwrite the fixed field allowlist unconditionally. Fields missing
    /// from the request are cleared; unknown fields are dropped.
    #[default]
    Replace,
    /// Overwrite only the fields present in the request, unknown ones included.
    Merge,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub trading_mode: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub max_loss: Option<Value>,
    /// Strategy family declared by the client (e.g. "short term gain").
    pub strategy_type: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub account_currency: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub account_company: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub leverage: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub account_name: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub trade_allowed: Option<Value>,
    /// Fields outside the allowlist. Only kept in [`SyncMode::Merge`].
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A key that was sent is `Some`, even when its value is `null`; only an
/// absent key stays `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Copies every listed field from `$src` into `$dst` when it is present.
macro_rules! merge_present {
    ($dst:expr, $src:expr, $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field;
            }
        )+
    };
}

impl AccountProfile {
    /// Keys owned by the account record itself; never accepted as extras.
    pub const RESERVED_KEYS: [&'static str; 3] = ["account_number", "account_updates", "strategies"];

    pub fn new(strategy_type: impl Into<String>) -> Self {
        Self {
            strategy_type: strategy_type.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, key: &str, value: Value) -> Self {
        match key {
            "access_token" => self.access_token = Some(value),
            "trading_mode" => self.trading_mode = Some(value),
            "max_loss" => self.max_loss = Some(value),
            "account_type" => self.account_type = Some(value),
            "account_currency" => self.account_currency = Some(value),
            "account_company" => self.account_company = Some(value),
            "leverage" => self.leverage = Some(value),
            "account_name" => self.account_name = Some(value),
            "trade_allowed" => self.trade_allowed = Some(value),
            "strategy_type" => {
                if let Value::String(s) = value {
                    self.strategy_type = s;
                }
            }
            k if Self::RESERVED_KEYS.contains(&k) => {}
            k => {
                self.extra.insert(k.to_string(), value);
            }
        }
        self
    }

    pub fn get_strategy_type(&self) -> &str {
        &self.strategy_type
    }

    /// Drops extra keys that would collide with the record's own fields.
    pub fn strip_reserved(&mut self) {
        for key in Self::RESERVED_KEYS {
            self.extra.remove(key);
        }
    }

    /// Folds `incoming` into this profile according to `mode`.
    pub fn apply(&mut self, incoming: AccountProfile, mode: SyncMode) {
        let mut incoming = incoming;
        incoming.strip_reserved();

        match mode {
            SyncMode::Replace => {
                incoming.extra.clear();
                *self = incoming;
            }
            SyncMode::Merge => {
                self.strategy_type = incoming.strategy_type;
                merge_present!(
                    self,
                    incoming,
                    access_token,
                    trading_mode,
                    max_loss,
                    account_type,
                    account_currency,
                    account_company,
                    leverage,
                    account_name,
                    trade_allowed,
                );
                self.extra.extend(incoming.extra);
            }
        }
    }
}
