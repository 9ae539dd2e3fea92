use std::sync::Arc;

use account::{GenerationError, GenerationRequest, StrategyDetails, StrategyGenerator, SyncMode};
use account_service::{
    generator::{CatalogGenerator, RandomizedGenerator},
    registry, router, AccountRegistry, AppState, HandlerSettings,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// A generator whose backend is always down.
struct FailingGenerator;

#[async_trait]
impl StrategyGenerator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(
        &self,
        _: GenerationRequest<'_>,
    ) -> Result<StrategyDetails, GenerationError> {
        Err(GenerationError::Unavailable("test outage".into()))
    }
}

fn catalog_state() -> AppState {
    AppState::new(
        AccountRegistry::new().into_shared(),
        Arc::new(CatalogGenerator::new()),
        HandlerSettings::default(),
    )
}

fn randomized_state() -> AppState {
    AppState::new(
        AccountRegistry::new().into_shared(),
        Arc::new(RandomizedGenerator::new(Some(42))),
        HandlerSettings {
            sync_mode: SyncMode::Merge,
            allow_zero_metrics: false,
            regenerate_on_update: true,
        },
    )
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    into_parts(app.clone().oneshot(request).await.unwrap()).await
}

async fn send_form(app: &Router, uri: &str, form: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();

    into_parts(app.clone().oneshot(request).await.unwrap()).await
}

async fn into_parts(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn metrics(balance: f64) -> Value {
    json!({
        "balance": balance,
        "equity": 100,
        "margin": 1,
        "free_margin": 1,
        "margin_level": 1,
        "profit": 1
    })
}

async fn sync(app: &Router, account: &str, strategy_type: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/sync",
        Some(json!({"account_number": account, "strategy_type": strategy_type})),
    )
    .await
}

async fn sync_with(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/api/sync", Some(body)).await
}

#[tokio::test]
async fn test_sync_short_term_gain() {
    let app = router(catalog_state());

    let (status, body) = sync(&app, "A1", "short term gain").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategy"]["validity"], json!(3600));
    assert_eq!(body["strategy"]["maxSlippage"], json!(10));
    assert_eq!(body["strategy"]["targetProfit"], json!(1000));
    assert_eq!(body["strategy"]["maxLoss"], json!(500));
    assert_eq!(body["strategy"]["type"], json!("scalping"));
}

#[tokio::test]
async fn test_first_sync_creates_record_with_one_strategy() {
    let state = catalog_state();
    let app = router(state.clone());

    sync(&app, "A1", "long term gain").await;

    let accounts = registry::read(&state.registry);
    assert_eq!(accounts.len(), 1);
    let record = accounts.find("A1").unwrap();
    assert!(record.get_updates().is_empty());
    assert_eq!(record.get_strategies().len(), 1);
}

#[tokio::test]
async fn test_resync_overwrites_without_new_record() {
    let state = catalog_state();
    let app = router(state.clone());

    send(
        &app,
        Method::POST,
        "/api/sync",
        Some(json!({
            "account_number": "A1",
            "strategy_type": "short term gain",
            "access_token": "old",
            "leverage": 100
        })),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/api/sync",
        Some(json!({
            "account_number": "A1",
            "strategy_type": "long term gain",
            "access_token": "new"
        })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/api/accounts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(1));

    let account = &body["accounts"][0];
    assert_eq!(account["access_token"], json!("new"));
    assert_eq!(account["strategy_type"], json!("long term gain"));
    assert!(account.get("leverage").is_none(), "catalog sync replaces every field");
    assert_eq!(account["strategies"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_sync_rejects_invalid_payloads() {
    let app = router(catalog_state());

    for body in [
        json!({"strategy_type": "x"}),
        json!({"account_number": 1, "strategy_type": "x"}),
        json!({"account_number": "A1"}),
        json!(["not", "an", "object"]),
    ] {
        let (status, response) = send(&app, Method::POST, "/api/sync", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "Invalid data received"}));
    }

    let (status, body) = send(&app, Method::GET, "/api/accounts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], json!(0));
}

#[tokio::test]
async fn test_sync_rejects_malformed_json() {
    let app = router(catalog_state());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sync")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"account_number\": "))
        .unwrap();

    let (status, body) = into_parts(app.oneshot(request).await.unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn test_sync_empty_json_body_is_invalid_data() {
    let app = router(catalog_state());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/sync")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();

    let (status, body) = into_parts(app.oneshot(request).await.unwrap()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid data received"}));
}

#[tokio::test]
async fn test_sync_accepts_form_body() {
    let app = router(catalog_state());

    let (status, body) = send_form(
        &app,
        "/api/sync",
        "account_number=F1&strategy_type=short+term+gain&leverage=100",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategy"]["validity"], json!(3600));

    let (status, _) = send_form(
        &app,
        "/api/sync/F1",
        "balance=10&equity=10&margin=1&free_margin=9&margin_level=1000&profit=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/api/accounts", None).await;
    assert_eq!(body["accounts"][0]["leverage"], json!("100"));
    assert_eq!(body["accounts"][0]["account_updates"][0]["margin_level"], json!(1000.0));
}

#[tokio::test]
async fn test_dynamic_update_appends_snapshot() {
    let state = catalog_state();
    let app = router(state.clone());
    sync(&app, "A1", "short term gain").await;

    let (status, body) = send(&app, Method::POST, "/api/sync/A1", Some(metrics(250.0))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Dynamic data received successfully"}));

    send(&app, Method::POST, "/api/sync/A1", Some(metrics(300.0))).await;

    let accounts = registry::read(&state.registry);
    let record = accounts.find("A1").unwrap();
    let updates = record.get_updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[1].metrics.balance, 300.0);
    assert_eq!(updates[1].metrics.equity, 100.0);
    assert!(updates[1].time > updates[0].time);
    assert_eq!(record.get_strategies().len(), 1, "catalog policy does not refresh");
}

#[tokio::test]
async fn test_dynamic_update_rejects_zero_balance() {
    let app = router(catalog_state());
    sync(&app, "A1", "short term gain").await;

    let (status, body) = send(&app, Method::POST, "/api/sync/A1", Some(metrics(0.0))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid dynamic data received"}));
}

#[tokio::test]
async fn test_form_dynamic_update_accepts_zero_string() {
    let state = catalog_state();
    let app = router(state.clone());
    send_form(&app, "/api/sync", "account_number=F1&strategy_type=short+term+gain").await;

    let (status, body) = send_form(
        &app,
        "/api/sync/F1",
        "balance=0&equity=10&margin=1&free_margin=9&margin_level=1000&profit=0",
    )
    .await;
    assert_eq!(status, StatusCode::OK, "got {}", body);

    let accounts = registry::read(&state.registry);
    let updates = accounts.find("F1").unwrap().get_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].metrics.balance, 0.0);
}

#[tokio::test]
async fn test_dynamic_update_accepts_zero_when_enabled() {
    let mut state = catalog_state();
    state.settings.allow_zero_metrics = true;
    let app = router(state);
    sync(&app, "A1", "short term gain").await;

    let (status, _) = send(&app, Method::POST, "/api/sync/A1", Some(metrics(0.0))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_dynamic_update_unknown_account() {
    let app = router(catalog_state());

    let (status, body) = send(&app, Method::POST, "/api/sync/GHOST", Some(metrics(5.0))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Account not found"}));
}

#[tokio::test]
async fn test_validation_runs_before_lookup() {
    let app = router(catalog_state());

    let (status, _) = send(&app, Method::POST, "/api/sync/GHOST", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_strategy_after_sync() {
    let app = router(catalog_state());
    let (_, synced) = sync(&app, "A1", "long term gain").await;

    let (status, body) = send(&app, Method::GET, "/api/strategy/A1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategyType"], json!("long term gain"));
    assert_eq!(body["lastStrategy"], synced["strategy"]);
}

#[tokio::test]
async fn test_strategy_unknown_account() {
    let app = router(catalog_state());

    let (status, body) = send(&app, Method::GET, "/api/strategy/UNKNOWN", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Account not found or no strategy available"}));
}

#[tokio::test]
async fn test_accounts_listed_in_sync_order() {
    let app = router(catalog_state());
    for account in ["B2", "A1", "C3"] {
        sync(&app, account, "x").await;
    }

    let (_, body) = send(&app, Method::GET, "/api/accounts", None).await;
    let numbers: Vec<&str> = body["accounts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["account_number"].as_str().unwrap())
        .collect();

    assert_eq!(body["count"], json!(3));
    assert_eq!(numbers, vec!["B2", "A1", "C3"]);
}

#[tokio::test]
async fn test_generation_failure_is_500_and_leaves_registry_untouched() {
    let state = AppState::new(
        AccountRegistry::new().into_shared(),
        Arc::new(FailingGenerator),
        HandlerSettings::default(),
    );
    let app = router(state.clone());

    let (status, body) = sync(&app, "A1", "x").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to generate strategy"}));
    assert!(registry::read(&state.registry).is_empty());
}

#[tokio::test]
async fn test_randomized_sync_merges_and_refreshes_on_update() {
    let state = randomized_state();
    let app = router(state.clone());

    send(
        &app,
        Method::POST,
        "/api/sync",
        Some(json!({
            "account_number": "R1",
            "strategy_type": "short term gain",
            "access_token": "tok",
            "terminal_build": 4100
        })),
    )
    .await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sync",
        Some(json!({"account_number": "R1", "strategy_type": "long term gain"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["strategy"]["lotSize"].is_number());

    let (status, body) = send(&app, Method::POST, "/api/dataSync/R1", Some(metrics(10.0))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Dynamic data received successfully"));
    assert!(body["strategy"].is_object());

    let (_, strategy) = send(&app, Method::GET, "/api/strategy/R1", None).await;
    assert_eq!(strategy["lastStrategy"], body["strategy"]);

    let accounts = registry::read(&state.registry);
    let record = accounts.find("R1").unwrap();
    assert_eq!(record.get_strategies().len(), 3);
    assert_eq!(record.get_updates().len(), 1);
    assert_eq!(record.get_profile().access_token, Some(json!("tok")));
    assert_eq!(record.get_profile().strategy_type, "long term gain");
    assert_eq!(record.get_profile().extra.get("terminal_build"), Some(&json!(4100)));
}

#[tokio::test]
async fn test_randomized_sync_null_overwrites_stored_value() {
    let state = randomized_state();
    let app = router(state.clone());

    sync_with(&app, json!({"account_number": "R2", "strategy_type": "x", "leverage": 100})).await;
    let (status, _) =
        sync_with(&app, json!({"account_number": "R2", "strategy_type": "x", "leverage": null})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/api/accounts", None).await;
    let account = body["accounts"][0].as_object().unwrap();
    assert_eq!(account.get("leverage"), Some(&Value::Null));
}

#[tokio::test]
async fn test_randomized_refresh_failure_records_nothing() {
    let state = catalog_state();
    let app = router(state.clone());
    sync(&app, "A1", "x").await;

    let failing = AppState::new(
        state.registry.clone(),
        Arc::new(FailingGenerator),
        HandlerSettings {
            regenerate_on_update: true,
            ..HandlerSettings::default()
        },
    );
    let (status, _) = send(&router(failing), Method::POST, "/api/dataSync/A1", Some(metrics(1.0))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let accounts = registry::read(&state.registry);
    assert!(accounts.find("A1").unwrap().get_updates().is_empty());
}

#[tokio::test]
async fn test_health_check() {
    let app = router(catalog_state());
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
