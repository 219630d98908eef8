use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result as AnyResult;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stocklens_core::{
    HistoryStore, ItemStore, StockItem, Timeframe, Transaction, TransactionType,
};
use stocklens_history::MemoryStore;
use stocklens_valuation::{DerivedMetrics, StockStatus, evaluate_stock_status};
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
struct AppState {
    store: Arc<MemoryStore>,
}

#[derive(Clone, Debug)]
struct ServiceConfig {
    http_addr: String,
}

impl ServiceConfig {
    fn from_env(default_http_addr: &str) -> Self {
        let http_addr =
            std::env::var("HTTP_ADDR").unwrap_or_else(|_| default_http_addr.to_string());
        Self { http_addr }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CreateItemRequest {
    name: String,
    cost_price: Option<Decimal>,
    #[serde(default)]
    quantity: i64,
    #[serde(default = "default_low_threshold")]
    low_stock_threshold: i64,
    #[serde(default = "default_critical_threshold")]
    critical_stock_threshold: i64,
}

fn default_low_threshold() -> i64 {
    10
}

fn default_critical_threshold() -> i64 {
    3
}

#[derive(Debug, Clone, Deserialize)]
struct RecordTransactionRequest {
    #[serde(rename = "type")]
    kind: TransactionType,
    change_amount: Decimal,
    cost_price: Option<Decimal>,
    /// Backdating is allowed for history imports; defaults to now.
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
struct MetricsQuery {
    timeframe: Option<String>,
}

#[derive(Debug, Serialize)]
struct ItemStatusResponse {
    item_id: Uuid,
    quantity: i64,
    stock_status: StockStatus,
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "stocklens_gateway=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8080");

    let state = AppState {
        store: Arc::new(MemoryStore::default()),
    };
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{item_id}", get(get_item))
        .route(
            "/items/{item_id}/transactions",
            get(list_transactions).post(record_transaction),
        )
        .route("/items/{item_id}/metrics", get(item_metrics))
        .route("/items/{item_id}/status", get(item_status))
        .with_state(state);

    let addr: SocketAddr = config.http_addr.parse()?;
    info!("gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<Json<StockItem>, (StatusCode, String)> {
    if payload.name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "name is required".to_string()));
    }
    if payload.quantity < 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "quantity must be non-negative".to_string(),
        ));
    }
    if payload.cost_price.is_some_and(|price| price < Decimal::ZERO) {
        return Err((
            StatusCode::BAD_REQUEST,
            "cost_price must be non-negative".to_string(),
        ));
    }

    let item = StockItem {
        id: Uuid::new_v4(),
        name: payload.name,
        cost_price: payload.cost_price,
        quantity: payload.quantity,
        low_stock_threshold: payload.low_stock_threshold,
        critical_stock_threshold: payload.critical_stock_threshold,
    };

    let item = state.store.upsert(item).await.map_err(internal_error)?;
    info!("item {} created", item.id);
    Ok(Json(item))
}

async fn list_items(
    State(state): State<AppState>,
) -> Result<Json<Vec<StockItem>>, (StatusCode, String)> {
    let items = state.store.list().await.map_err(internal_error)?;
    Ok(Json(items))
}

async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<StockItem>, (StatusCode, String)> {
    let item = fetch_item(&state, item_id).await?;
    Ok(Json(item))
}

async fn record_transaction(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<RecordTransactionRequest>,
) -> Result<Json<Transaction>, (StatusCode, String)> {
    fetch_item(&state, item_id).await?;

    if payload.cost_price.is_some_and(|price| price < Decimal::ZERO) {
        return Err((
            StatusCode::BAD_REQUEST,
            "cost_price must be non-negative".to_string(),
        ));
    }

    let transaction = Transaction {
        id: Uuid::new_v4(),
        kind: payload.kind,
        change_amount: payload.change_amount,
        cost_price: payload.cost_price,
        created_at: payload.created_at.unwrap_or_else(Utc::now),
    };

    let transaction = state
        .store
        .record(item_id, transaction)
        .await
        .map_err(internal_error)?;
    info!("transaction {} recorded for item {}", transaction.id, item_id);
    Ok(Json(transaction))
}

async fn list_transactions(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<Vec<Transaction>>, (StatusCode, String)> {
    fetch_item(&state, item_id).await?;
    let history = state.store.history(item_id).await.map_err(internal_error)?;
    Ok(Json(history))
}

async fn item_metrics(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<DerivedMetrics>, (StatusCode, String)> {
    let timeframe = match query.timeframe {
        Some(raw) => raw
            .parse::<Timeframe>()
            .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?,
        None => Timeframe::All,
    };

    let item = fetch_item(&state, item_id).await?;
    let history = state.store.history(item_id).await.map_err(internal_error)?;

    let metrics = DerivedMetrics::compute(&item, &history, timeframe, Utc::now());
    Ok(Json(metrics))
}

async fn item_status(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ItemStatusResponse>, (StatusCode, String)> {
    let item = fetch_item(&state, item_id).await?;
    let stock_status = evaluate_stock_status(
        item.quantity,
        item.low_stock_threshold,
        item.critical_stock_threshold,
    );

    Ok(Json(ItemStatusResponse {
        item_id: item.id,
        quantity: item.quantity,
        stock_status,
    }))
}

async fn fetch_item(
    state: &AppState,
    item_id: Uuid,
) -> Result<StockItem, (StatusCode, String)> {
    state
        .store
        .fetch(item_id)
        .await
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "item not found".to_string()))
}

fn internal_error(err: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
