use crate::error::ApiError;
use crate::state::AppState;
use aide::models::chat::ChatTurn;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct HistoryResponse {
    turns: Vec<ChatTurn>,
}

async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound(format!("Session '{}' not found", session_id)))?;

    Ok(Json(HistoryResponse {
        turns: session.history().to_vec(),
    }))
}

async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut sessions = state.sessions.lock().await;
    sessions
        .remove(&session_id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiError::NotFound(format!("Session '{}' not found", session_id)))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/sessions/:id/history", get(history))
        .route("/sessions/:id", axum::routing::delete(end_session))
        .with_state(state)
}
