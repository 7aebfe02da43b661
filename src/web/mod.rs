//! Web API module for Opsdeck.
//!
//! This module provides a REST API for the Opsdeck dashboard, enabling a
//! web-based frontend to interact with the order book, the calculators,
//! and the floor devices.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/orders` - List orders (optional ?status=)
//! - `POST /api/orders` - Create a draft order
//! - `GET /api/orders/revision` - Current order book revision
//! - `GET /api/orders/{id}` - Fetch one order
//! - `PUT /api/orders/{id}/status` - Move an order to a new status
//! - `DELETE /api/orders/{id}` - Remove an order
//! - `POST /api/calc/distribution` - Color distribution for a grid
//! - `POST /api/calc/setup` - Sheet/box/carton counts
//! - `POST /api/plan` - Production plan for the open orders
//! - `GET /api/devices/{kind}/ws` - WebSocket command channel per device

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::calc::{compute_distribution, compute_setup, SetupParams, SetupPlan};
use crate::config::Config;
use crate::models::{ColorDistribution, Design, Order, OrderStatus, PieceColor};
use crate::services::{compute_plan, OrderStore, ProductionPlan};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the web API.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    config: Arc<Config>,
    /// Order book, shared between handlers
    store: Arc<Mutex<OrderStore>>,
}

impl AppState {
    /// Creates a new application state, opening the order store.
    ///
    /// # Errors
    ///
    /// Returns an error if the order store cannot be opened.
    pub fn new(config: Config, orders_path: PathBuf) -> anyhow::Result<Self> {
        let store = OrderStore::open(orders_path)?;
        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
        })
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Current health status (e.g., "healthy").
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Query parameters for order listing.
#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    /// Filter to one status.
    pub status: Option<String>,
}

/// Order creation request.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Customer name.
    pub customer: String,
    /// Design name.
    pub design: String,
    /// Grid width in pieces.
    pub width: u32,
    /// Grid height in pieces.
    pub height: u32,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
}

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    /// Target status.
    pub status: String,
}

/// Order book revision response.
#[derive(Debug, Serialize)]
pub struct RevisionResponse {
    /// Monotonic revision counter, bumped on every committed change.
    pub revision: u64,
}

/// Distribution calculation request.
#[derive(Debug, Deserialize)]
pub struct DistributionRequest {
    /// Stock design name. Mutually exclusive with `colors`.
    pub design: Option<String>,
    /// Explicit hex color palette. Mutually exclusive with `design`.
    pub colors: Option<Vec<String>>,
    /// Grid width in pieces.
    pub width: u32,
    /// Grid height in pieces.
    pub height: u32,
}

/// Setup calculation request.
#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    /// Total pieces.
    pub pieces: u32,
    /// Optional override of the shop's setup constants.
    pub params: Option<SetupParams>,
}

/// Plan request.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    /// Daily capacity override; defaults to the configured shop capacity.
    pub daily_capacity: Option<u32>,
    /// First production day; defaults to today.
    pub start_date: Option<NaiveDate>,
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
}

impl ApiError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (StatusCode::BAD_REQUEST, Json(ApiError::new(message)))
}

fn not_found(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (StatusCode::NOT_FOUND, Json(ApiError::new(message)))
}

fn internal_error(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError::new(message)),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /health`
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/orders`
async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    let store = state.store.lock().await;
    let orders = match query.status.as_deref() {
        Some(raw) => {
            let status: OrderStatus = raw.parse().map_err(|e| bad_request(format!("{e}")))?;
            store.list_by_status(status).into_iter().cloned().collect()
        }
        None => store.list().to_vec(),
    };
    Ok(Json(orders))
}

/// `POST /api/orders`
async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = Order::new(
        request.customer,
        request.design,
        request.width,
        request.height,
        request.due_date,
    )
    .map_err(|e| bad_request(e.to_string()))?;

    let mut store = state.store.lock().await;
    let created = order.clone();
    store
        .add(order)
        .map_err(|e| internal_error(e.to_string()))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/orders/revision`
async fn get_revision(State(state): State<AppState>) -> Json<RevisionResponse> {
    let store = state.store.lock().await;
    Json(RevisionResponse {
        revision: store.revision(),
    })
}

/// `GET /api/orders/{id}`
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    let id = parse_order_id(&id)?;
    let store = state.store.lock().await;
    store
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("No order with id {id}")))
}

/// `PUT /api/orders/{id}/status`
async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StatusChangeRequest>,
) -> ApiResult<Json<Order>> {
    let id = parse_order_id(&id)?;
    let status: OrderStatus = request
        .status
        .parse()
        .map_err(|e| bad_request(format!("{e}")))?;

    let mut store = state.store.lock().await;
    if store.get(id).is_none() {
        return Err(not_found(format!("No order with id {id}")));
    }
    // Id exists, so a failure here is an illegal transition
    let order = store
        .set_status(id, status)
        .map_err(|e| (StatusCode::CONFLICT, Json(ApiError::new(e.to_string()))))?;
    Ok(Json(order.clone()))
}

/// `DELETE /api/orders/{id}`
async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_order_id(&id)?;
    let mut store = state.store.lock().await;
    if store.get(id).is_none() {
        return Err(not_found(format!("No order with id {id}")));
    }
    store
        .remove(id)
        .map_err(|e| internal_error(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/calc/distribution`
async fn calc_distribution(
    Json(request): Json<DistributionRequest>,
) -> ApiResult<Json<ColorDistribution>> {
    let colors: Vec<PieceColor> = match (&request.design, &request.colors) {
        (Some(_), Some(_)) => {
            return Err(bad_request("Provide either a design or colors, not both"))
        }
        (Some(name), None) => {
            let design = Design::stock_catalog()
                .into_iter()
                .find(|d| d.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| bad_request(format!("Unknown design '{name}'")))?;
            design.colors().to_vec()
        }
        (None, Some(hex_list)) => hex_list
            .iter()
            .map(|hex| PieceColor::from_hex(hex))
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| bad_request(e.to_string()))?,
        (None, None) => return Err(bad_request("Provide a design or a color list")),
    };

    let total = request
        .width
        .checked_mul(request.height)
        .ok_or_else(|| bad_request("Grid is too large"))?;

    let distribution =
        compute_distribution(&colors, total).map_err(|e| bad_request(e.to_string()))?;
    Ok(Json(distribution))
}

/// `POST /api/calc/setup`
async fn calc_setup(
    State(state): State<AppState>,
    Json(request): Json<SetupRequest>,
) -> ApiResult<Json<SetupPlan>> {
    let params = request.params.unwrap_or(state.config.shop.setup);
    let plan = compute_setup(request.pieces, &params).map_err(|e| bad_request(e.to_string()))?;
    Ok(Json(plan))
}

/// `POST /api/plan`
async fn make_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> ApiResult<Json<ProductionPlan>> {
    let capacity = request
        .daily_capacity
        .unwrap_or(state.config.shop.daily_capacity);
    let start = request.start_date.unwrap_or_else(|| Utc::now().date_naive());

    let store = state.store.lock().await;
    let plan = compute_plan(&store.open_orders(), capacity, start)
        .map_err(|e| bad_request(e.to_string()))?;
    Ok(Json(plan))
}

fn parse_order_id(raw: &str) -> Result<Uuid, (StatusCode, Json<ApiError>)> {
    raw.parse()
        .map_err(|_| bad_request(format!("Invalid order id '{raw}'")))
}

// ============================================================================
// Device WebSocket Channel
// ============================================================================

/// Acknowledgement sent back on the device command channel.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandAck {
    /// Whether the command was accepted.
    pub ok: bool,
    /// Error message when rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /api/devices/{kind}/ws`
async fn device_ws(
    ws: WebSocketUpgrade,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    let kind: crate::device::DeviceKind =
        kind.parse().map_err(|e| bad_request(format!("{e}")))?;
    Ok(ws.on_upgrade(move |socket| device_channel(socket, kind)))
}

/// Per-connection loop: validate command envelopes, ack or reject.
async fn device_channel(mut socket: WebSocket, kind: crate::device::DeviceKind) {
    info!("Device channel opened for {kind}");
    while let Some(Ok(message)) = socket.recv().await {
        let response = match message {
            Message::Text(text) => Some(validate_command(&text, kind)),
            // Axum answers Ping frames with Pong automatically
            Message::Close(_) => break,
            _ => None,
        };
        if let Some(ack) = response {
            let Ok(body) = serde_json::to_string(&ack) else {
                break;
            };
            if socket.send(Message::Text(body.into())).await.is_err() {
                break;
            }
        }
    }
    info!("Device channel closed for {kind}");
}

/// Checks a command frame against the closed vocabulary and the path device.
fn validate_command(text: &str, kind: crate::device::DeviceKind) -> CommandAck {
    let envelope: crate::device::CommandEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            return CommandAck {
                ok: false,
                error: Some(format!("Unrecognized command: {e}")),
            }
        }
    };
    if envelope.device() != kind {
        return CommandAck {
            ok: false,
            error: Some(format!(
                "Command is for {}, this channel controls {kind}",
                envelope.device()
            )),
        };
    }
    if let Err(e) = envelope.validate() {
        return CommandAck {
            ok: false,
            error: Some(e.to_string()),
        };
    }
    CommandAck {
        ok: true,
        error: None,
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - allow all origins for development
    // NOTE: This permissive CORS policy is intended for local development only.
    // The server is designed to run on the shop floor network alongside the
    // frontend, not on the public internet.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Order endpoints
        .route("/api/orders", get(list_orders).post(create_order))
        .route("/api/orders/revision", get(get_revision))
        .route("/api/orders/{id}", get(get_order).delete(delete_order))
        .route("/api/orders/{id}/status", axum::routing::put(change_status))
        // Calculator endpoints
        .route("/api/calc/distribution", post(calc_distribution))
        .route("/api/calc/setup", post(calc_setup))
        // Planning endpoint
        .route("/api/plan", post(make_plan))
        // Device command channels
        .route("/api/devices/{kind}/ws", get(device_ws))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the web server.
///
/// # Errors
///
/// Returns an error if the order store cannot be opened or the server
/// fails to start.
pub async fn run_server(config: Config, orders_path: PathBuf, addr: SocketAddr) -> anyhow::Result<()> {
    let state = AppState::new(config, orders_path)?;
    let app = create_router(state);

    info!("Starting Opsdeck web server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
