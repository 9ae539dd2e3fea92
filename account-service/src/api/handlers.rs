use account::{GenerationRequest, StrategyDetails};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use log::{error, info};
use serde::Serialize;

use super::error::{ApiError, ACCOUNT_NOT_FOUND, NO_STRATEGY_AVAILABLE};
use super::payload::{parse_metrics, Payload, SyncRequest};
use super::AppState;
use crate::registry;

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub strategy: StrategyDetails,
}

#[derive(Debug, Serialize)]
pub struct DynamicDataResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyDetails>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyResponse {
    pub strategy_type: String,
    pub last_strategy: StrategyDetails,
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// `POST /api/sync`: registers or refreshes an account and hands it a strategy.
///
/// The strategy is generated before the registry is touched, so a failed
/// generation leaves the registry unchanged.
pub async fn sync_account(
    State(state): State<AppState>,
    Payload(body): Payload,
) -> Result<Json<SyncResponse>, ApiError> {
    let request = SyncRequest::from_payload(body)?;
    info!(
        "Sync for account {} (strategy type '{}')",
        request.account_number, request.profile.strategy_type
    );

    let strategy = state
        .generator
        .generate(GenerationRequest::new(&request.account_number, &request.profile))
        .await
        .map_err(|e| {
            error!(
                "Strategy generation failed for account {}: {}",
                request.account_number, e
            );
            ApiError::from(e)
        })?;

    let mut accounts = registry::write(&state.registry);
    let record = accounts.upsert(
        &request.account_number,
        request.profile,
        state.settings.sync_mode,
    );
    let strategy = record.push_strategy(strategy).clone();

    Ok(Json(SyncResponse { strategy }))
}

/// `POST /api/sync/:account_number` (alias `/api/dataSync/:account_number`):
/// stores a metric snapshot, optionally refreshing the strategy from the
/// account's last synced profile.
pub async fn record_dynamic_data(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
    Payload(body): Payload,
) -> Result<Json<DynamicDataResponse>, ApiError> {
    let received_at = Utc::now();
    let metrics = parse_metrics(&body, state.settings.allow_zero_metrics)?;

    let profile = {
        let accounts = registry::read(&state.registry);
        let record = accounts
            .find(&account_number)
            .ok_or_else(|| ApiError::NotFound(ACCOUNT_NOT_FOUND.to_string()))?;
        record.get_profile().clone()
    };

    let strategy = if state.settings.regenerate_on_update {
        let generated = state
            .generator
            .generate(GenerationRequest::new(&account_number, &profile))
            .await
            .map_err(|e| {
                error!(
                    "Strategy refresh failed for account {}: {}",
                    account_number, e
                );
                ApiError::from(e)
            })?;
        Some(generated)
    } else {
        None
    };

    let mut accounts = registry::write(&state.registry);
    accounts
        .record_update(&account_number, received_at, metrics)
        .ok_or_else(|| ApiError::NotFound(ACCOUNT_NOT_FOUND.to_string()))?;
    let strategy = strategy.and_then(|s| accounts.record_strategy(&account_number, s).cloned());
    info!("Recorded metrics for account {}", account_number);

    Ok(Json(DynamicDataResponse {
        message: "Dynamic data received successfully",
        strategy,
    }))
}

/// `GET /api/strategy/:account_number`: the latest strategy of an account.
pub async fn get_strategy(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<StrategyResponse>, ApiError> {
    let accounts = registry::read(&state.registry);
    let found = accounts
        .find(&account_number)
        .and_then(|record| record.last_strategy().map(|strategy| (record, strategy)));

    match found {
        Some((record, strategy)) => Ok(Json(StrategyResponse {
            strategy_type: record.get_profile().strategy_type.clone(),
            last_strategy: strategy.clone(),
        })),
        None => Err(ApiError::NotFound(NO_STRATEGY_AVAILABLE.to_string())),
    }
}

/// `GET /api/accounts`: every record, in registration order.
pub async fn list_accounts(State(state): State<AppState>) -> impl IntoResponse {
    let accounts = registry::read(&state.registry);
    Json(serde_json::json!({
        "count": accounts.len(),
        "accounts": accounts.list(),
    }))
}
