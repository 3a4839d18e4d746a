use crate::sessions::SessionStore;
use aide::assistant::Assistant;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    /// In-memory only; sessions are lost on restart
    pub sessions: Arc<Mutex<SessionStore>>,
}

impl AppState {
    pub fn new(assistant: Assistant, sessions: SessionStore) -> Self {
        Self {
            assistant: Arc::new(assistant),
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }
}
