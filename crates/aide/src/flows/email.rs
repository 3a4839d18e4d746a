use serde::{Deserialize, Serialize};

use super::{require_non_blank, run_flow};
use crate::errors::FlowResult;
use crate::providers::base::Provider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDraftRequest {
    pub topic: String,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

pub async fn draft_email(
    provider: &dyn Provider,
    request: &EmailDraftRequest,
) -> FlowResult<EmailDraft> {
    require_non_blank("topic", &request.topic)?;
    run_flow(provider, "email_draft.md", request).await
}
