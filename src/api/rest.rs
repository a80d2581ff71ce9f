use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use crate::models::{AlertDirection, CustomAlert};
use crate::services::{DashboardStore, PreferenceStore, SyncOrchestrator};
use crate::services::store::DashboardSnapshot;
use crate::sources::raw::value_to_f64;

pub struct AppState {
    pub orchestrator: Arc<SyncOrchestrator>,
    pub store: Arc<DashboardStore>,
    pub prefs: Arc<PreferenceStore>,
}

fn error(status: StatusCode, message: impl ToString) -> Response {
    (status, Json(serde_json::json!({ "error": message.to_string() }))).into_response()
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}

/// GET /state - everything the dashboard renders
async fn get_state(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.store.snapshot(state.prefs.dark_mode()))
}

/// POST /sync
async fn sync(State(state): State<Arc<AppState>>) -> Response {
    Json(state.orchestrator.sync_primary().await).into_response()
}

/// POST /sync/all - backend sync, then refresh
async fn sync_all(State(state): State<Arc<AppState>>) -> Response {
    match state.orchestrator.sync_all().await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => error(StatusCode::BAD_GATEWAY, e),
    }
}

/// POST /sync/royal
async fn royal_sync(State(state): State<Arc<AppState>>) -> Response {
    Json(state.orchestrator.royal_sync().await).into_response()
}

/// POST /report
async fn report(State(state): State<Arc<AppState>>) -> Response {
    match state.orchestrator.generate_report().await {
        Ok(path) => Json(serde_json::json!({ "path": path.display().to_string() })).into_response(),
        Err(e) => error(StatusCode::BAD_GATEWAY, e),
    }
}

/// GET /alerts
async fn list_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<CustomAlert>> {
    Json(state.store.read(|s| s.custom_alerts.clone()))
}

#[derive(Debug, Deserialize)]
struct NewAlert {
    #[serde(default)]
    coin: String,
    /// Number or numeric string, as typed by the user
    #[serde(default)]
    price: serde_json::Value,
    #[serde(rename = "type", default)]
    direction: Option<AlertDirection>,
}

/// POST /alerts
async fn add_alert(State(state): State<Arc<AppState>>, Json(body): Json<NewAlert>) -> Response {
    let price = value_to_f64(&body.price).unwrap_or(0.0);
    let direction = body.direction.unwrap_or(AlertDirection::Above);

    match state.store.add_alert(&body.coin, price, direction) {
        Ok(alert) => (StatusCode::CREATED, Json(alert)).into_response(),
        Err(e) => error(StatusCode::BAD_REQUEST, e),
    }
}

/// DELETE /alerts/:id
async fn remove_alert(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> StatusCode {
    if state.store.remove_alert(id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// GET /prefs
async fn get_prefs(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "darkMode": state.prefs.dark_mode() }))
}

#[derive(Debug, Deserialize)]
struct DarkModeBody {
    #[serde(alias = "darkMode")]
    dark_mode: bool,
}

/// PUT /prefs/dark-mode
async fn set_dark_mode(State(state): State<Arc<AppState>>, Json(body): Json<DarkModeBody>) -> Response {
    match state.prefs.set_dark_mode(body.dark_mode) {
        Ok(()) => Json(serde_json::json!({ "darkMode": body.dark_mode })).into_response(),
        Err(e) => error(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

pub fn create_rest_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/sync", post(sync))
        .route("/sync/all", post(sync_all))
        .route("/sync/royal", post(royal_sync))
        .route("/report", post(report))
        .route("/alerts", get(list_alerts).post(add_alert))
        .route("/alerts/:id", delete(remove_alert))
        .route("/prefs", get(get_prefs))
        .route("/prefs/dark-mode", put(set_dark_mode))
        .route("/ws", get(super::ws_handler))
        .with_state(state)
}
