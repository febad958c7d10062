use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use crate::dice::Roller;
use crate::service::{ActionRequest, ActionResponse, BattleService, StartRequest, StartResponse};
use crate::session::SessionStore;

type SharedService<S, R> = Arc<BattleService<S, R>>;

/// Builds the battle API router around a shared service.
pub fn create_router<S, R>(service: SharedService<S, R>) -> Router
where
    S: SessionStore + Send + 'static,
    R: Roller + Send + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/battle/start", post(start_battle::<S, R>))
        .route("/battle/action", post(battle_action::<S, R>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn start_battle<S, R>(
    State(service): State<SharedService<S, R>>,
    Json(request): Json<StartRequest>,
) -> Result<Json<StartResponse>, ApiError>
where
    S: SessionStore + Send + 'static,
    R: Roller + Send + 'static,
{
    Ok(Json(service.start(request)?))
}

/// A missing battle is reported with 200 and a `message` body.
async fn battle_action<S, R>(
    State(service): State<SharedService<S, R>>,
    Json(request): Json<ActionRequest>,
) -> Result<Json<ActionResponse>, ApiError>
where
    S: SessionStore + Send + 'static,
    R: Roller + Send + 'static,
{
    Ok(Json(service.act(request)?))
}
