//! REST endpoints for the wizard and the stored profile.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::error::SyncReport;

use super::controller::WizardController;

/// Shared state for wizard routes.
#[derive(Clone)]
pub struct WizardRouteState {
    pub controller: Arc<WizardController>,
}

/// One answer for the current step.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum WizardInput {
    Select(String),
    Toggle(String),
    Text(String),
    Boolean(bool),
    Day(String),
}

#[derive(Debug, Deserialize)]
struct SelectedQuery {
    option: String,
}

/// Build the wizard REST routes.
pub fn wizard_routes(state: WizardRouteState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/api/wizard", get(get_status))
        .route("/api/wizard/input", post(post_input))
        .route("/api/wizard/next", post(post_next))
        .route("/api/wizard/previous", post(post_previous))
        .route("/api/wizard/skip", post(post_skip))
        .route("/api/wizard/selected", get(get_selected))
        .route("/api/profile", get(get_profile).delete(delete_profile))
        .route("/api/profile/sync", post(post_sync))
        .route("/api/profile/load", post(post_load))
        .layer(cors)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "nutri-profile"
    }))
}

/// GET /api/wizard
async fn get_status(State(state): State<WizardRouteState>) -> impl IntoResponse {
    Json(state.controller.status().await)
}

/// POST /api/wizard/input
///
/// 422 when the input kind does not fit the current step.
async fn post_input(
    State(state): State<WizardRouteState>,
    Json(input): Json<WizardInput>,
) -> impl IntoResponse {
    let controller = &state.controller;
    let result = match &input {
        WizardInput::Select(label) => controller.select_option(label).await,
        WizardInput::Toggle(label) => controller.toggle_option(label).await,
        WizardInput::Text(raw) => controller.input_text(raw).await,
        WizardInput::Boolean(value) => controller.choose_boolean(*value).await,
        WizardInput::Day(day) => controller.toggle_day(day).await,
    };

    match result {
        Ok(outcome) => Json(serde_json::json!({
            "outcome": outcome,
            "status": controller.status().await,
        }))
        .into_response(),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// POST /api/wizard/next
///
/// Always 200: a blocked move or a failed submission is reported in the body.
async fn post_next(State(state): State<WizardRouteState>) -> impl IntoResponse {
    let advance = state.controller.advance().await;
    Json(serde_json::json!({
        "advance": advance,
        "status": state.controller.status().await,
    }))
}

/// POST /api/wizard/previous
async fn post_previous(State(state): State<WizardRouteState>) -> impl IntoResponse {
    state.controller.retreat().await;
    Json(state.controller.status().await)
}

/// POST /api/wizard/skip
///
/// 409 when the current step cannot be skipped.
async fn post_skip(State(state): State<WizardRouteState>) -> impl IntoResponse {
    match state.controller.skip().await {
        Some(_) => Json(state.controller.status().await).into_response(),
        None => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "This step cannot be skipped"})),
        )
            .into_response(),
    }
}

/// GET /api/wizard/selected?option=...
async fn get_selected(
    State(state): State<WizardRouteState>,
    Query(query): Query<SelectedQuery>,
) -> impl IntoResponse {
    let selected = state.controller.is_option_selected(&query.option).await;
    Json(serde_json::json!({"option": query.option, "selected": selected}))
}

/// GET /api/profile
///
/// Returns the stored profile, or 404 if none exists.
async fn get_profile(State(state): State<WizardRouteState>) -> impl IntoResponse {
    match state.controller.store().profile().await {
        Some(profile) => Json(profile).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No profile exists yet"})),
        )
            .into_response(),
    }
}

/// DELETE /api/profile
async fn delete_profile(State(state): State<WizardRouteState>) -> impl IntoResponse {
    state.controller.reset().await;
    StatusCode::NO_CONTENT
}

/// POST /api/profile/sync
async fn post_sync(State(state): State<WizardRouteState>) -> impl IntoResponse {
    let result = state.controller.store().sync_current(false).await;
    Json(SyncReport::from(&result))
}

/// POST /api/profile/load
async fn post_load(State(state): State<WizardRouteState>) -> impl IntoResponse {
    let result = state.controller.store().load_remote().await;
    Json(SyncReport::from(&result))
}
