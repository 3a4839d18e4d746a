use crate::error::ApiError;
use crate::state::AppState;
use aide::flows::{
    brainstorm, draft_email, social_post, BrainstormRequest, EmailDraft, EmailDraftRequest, Idea,
    SocialPost, SocialPostRequest,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct BrainstormResponse {
    ideas: Vec<Idea>,
}

async fn email_draft_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmailDraftRequest>, JsonRejection>,
) -> Result<Json<EmailDraft>, ApiError> {
    let Json(request) = payload?;
    let draft = draft_email(state.assistant.provider(), &request).await?;
    Ok(Json(draft))
}

async fn brainstorm_handler(
    State(state): State<AppState>,
    payload: Result<Json<BrainstormRequest>, JsonRejection>,
) -> Result<Json<BrainstormResponse>, ApiError> {
    let Json(request) = payload?;
    let ideas = brainstorm(state.assistant.provider(), &request).await?;
    Ok(Json(BrainstormResponse { ideas }))
}

async fn social_post_handler(
    State(state): State<AppState>,
    payload: Result<Json<SocialPostRequest>, JsonRejection>,
) -> Result<Json<SocialPost>, ApiError> {
    let Json(request) = payload?;
    let post = social_post(state.assistant.provider(), &request).await?;
    Ok(Json(post))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/flows/email-draft", post(email_draft_handler))
        .route("/flows/brainstorm", post(brainstorm_handler))
        .route("/flows/social-post", post(social_post_handler))
        .with_state(state)
}
