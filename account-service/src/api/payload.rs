//! Request body extraction and validation.
//!
//! Terminals post either JSON or url-encoded forms. Both are normalised into
//! a JSON object before validation; form values stay strings.

use std::collections::HashMap;

use account::{AccountMetrics, AccountProfile};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
    Form, Json,
};
use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::{ApiError, INVALID_DYNAMIC_DATA, INVALID_SYNC_DATA};

/// A request body as a JSON object.
///
/// Bodies that are not an object, or carry an unsupported content type,
/// extract as an empty object and fail validation downstream.
#[derive(Debug, Clone, Default)]
pub struct Payload(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|rejection| {
                    warn!("Rejected form body: {}", rejection.body_text());
                    ApiError::Validation("Malformed request body".to_string())
                })?;
            let object = fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            return Ok(Payload(object));
        }

        if content_type.starts_with("application/json") {
            let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
                warn!("Unreadable JSON body: {}", rejection.body_text());
                ApiError::Validation("Malformed request body".to_string())
            })?;
            // An empty JSON body reads as an empty object.
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Payload::default());
            }
            let Json(value) = Json::<Value>::from_bytes(&bytes).map_err(|rejection| {
                warn!("Rejected JSON body: {}", rejection.body_text());
                ApiError::Validation("Malformed request body".to_string())
            })?;
            return Ok(match value {
                Value::Object(object) => Payload(object),
                _ => Payload::default(),
            });
        }

        Ok(Payload::default())
    }
}

/// A validated static account sync.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncRequest {
    pub account_number: String,
    #[serde(flatten)]
    pub profile: AccountProfile,
}

impl SyncRequest {
    /// Requires non-empty string `account_number` and `strategy_type`.
    pub fn from_payload(payload: Map<String, Value>) -> Result<Self, ApiError> {
        let request: SyncRequest =
            serde_json::from_value(Value::Object(payload)).map_err(|e| {
                warn!("Invalid sync payload: {}", e);
                ApiError::Validation(INVALID_SYNC_DATA.to_string())
            })?;

        if request.account_number.is_empty() || request.profile.strategy_type.is_empty() {
            warn!("Invalid sync payload: empty account number or strategy type");
            return Err(ApiError::Validation(INVALID_SYNC_DATA.to_string()));
        }

        let mut request = request;
        request.profile.strip_reserved();
        Ok(request)
    }
}

/// Reads a metric given as a JSON number or a numeric string.
///
/// A numeric `0` counts as missing unless `allow_zero`; the string `"0"`
/// (as sent by form bodies) is always a value.
fn metric_value(value: &Value, allow_zero: bool) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64().filter(|n| allow_zero || *n != 0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Validates the six dynamic metrics. Every metric is required.
pub fn parse_metrics(payload: &Map<String, Value>, allow_zero: bool) -> Result<AccountMetrics, ApiError> {
    let mut values = [0.0; 6];

    for (slot, field) in values.iter_mut().zip(AccountMetrics::FIELDS) {
        *slot = payload
            .get(field)
            .and_then(|value| metric_value(value, allow_zero))
            .ok_or_else(|| {
                warn!("Invalid dynamic payload: bad or missing {}", field);
                ApiError::Validation(INVALID_DYNAMIC_DATA.to_string())
            })?;
    }

    Ok(AccountMetrics::from_ordered(values))
}
