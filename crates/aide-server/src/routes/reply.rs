use crate::error::ApiError;
use crate::state::AppState;
use aide::{
    dispatch::{IntentDispatcher, Navigator, SessionContext},
    models::intent::AssistantResponse,
    models::navigation::{NavigationTarget, ParamCarry},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest {
    #[serde(default)]
    session_id: Option<Uuid>,
    text: String,
    #[serde(default)]
    image_ref: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyResponse {
    session_id: Uuid,
    #[serde(flatten)]
    response: AssistantResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    navigation: Option<Navigation>,
}

/// A navigation target as the UI consumes it
#[derive(Debug, Serialize)]
struct Navigation {
    path: String,
    href: String,
    params: BTreeMap<String, String>,
    carry: ParamCarry,
}

impl From<NavigationTarget> for Navigation {
    fn from(target: NavigationTarget) -> Self {
        Navigation {
            href: target.href(),
            path: target.path,
            params: target.params.into_iter().collect(),
            carry: target.carry,
        }
    }
}

/// Hands the dispatched target back to the client in the HTTP response
#[derive(Default)]
struct ResponseNavigator {
    target: Mutex<Option<NavigationTarget>>,
}

impl ResponseNavigator {
    fn take(&self) -> Option<NavigationTarget> {
        self.target.lock().ok().and_then(|mut target| target.take())
    }
}

impl Navigator for ResponseNavigator {
    fn navigate(&self, context: &SessionContext, target: &NavigationTarget) {
        tracing::debug!(user_id = ?context.user_id, path = %target.path, "navigating client");
        if let Ok(mut slot) = self.target.lock() {
            *slot = Some(target.clone());
        }
    }
}

/// Session context comes from the request, never from server side globals
fn session_context(headers: &HeaderMap) -> SessionContext {
    let access_token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    SessionContext {
        user_id,
        access_token,
    }
}

async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ReplyRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, ApiError> {
    let Json(request) = payload?;
    let context = session_context(&headers);

    // Snapshot history so the lock is not held across the provider call.
    // Overlapping messages for one session are not serialized; each is recorded
    // when its reply arrives.
    let (session_id, history) = {
        let mut sessions = state.sessions.lock().await;
        match request.session_id {
            Some(id) => {
                let session = sessions
                    .get(&id)
                    .ok_or_else(|| ApiError::NotFound(format!("Session '{}' not found", id)))?;
                (id, session.history().to_vec())
            }
            None => (Uuid::new_v4(), Vec::new()),
        }
    };

    let interpretation = state
        .assistant
        .interpret(&history, &request.text, request.image_ref.as_deref())
        .await;

    let dispatcher = IntentDispatcher::new(ResponseNavigator::default());
    {
        let mut sessions = state.sessions.lock().await;
        let session = sessions.get_or_create(session_id);
        session.record(&request.text, &interpretation);
        session.pending_intent().fire(&dispatcher, &context);
        tracing::debug!(%session_id, live_sessions = sessions.len(), "recorded reply");
    }

    Ok(Json(ReplyResponse {
        session_id,
        response: interpretation.into(),
        navigation: dispatcher.navigator().take().map(Navigation::from),
    }))
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/reply", post(handler))
        .with_state(state)
}
