//! Single shot generation flows: render a bundled prompt, ask the provider,
//! pull the JSON object out of whatever comes back.
//!
//! Unlike intent interpretation these do not fall back; a failure is returned
//! for the caller to show.
pub mod brainstorm;
pub mod email;
pub mod social;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::error::Category;

use crate::errors::{FlowError, FlowResult, InterpretError};
use crate::parser::extract_json_object;
use crate::prompt_template::load_prompt_file;
use crate::providers::base::Provider;

pub use brainstorm::{brainstorm, BrainstormRequest, Idea};
pub use email::{draft_email, EmailDraft, EmailDraftRequest};
pub use social::{social_post, Platform, SocialPost, SocialPostRequest};

/// Decode the JSON object embedded in raw model output
pub fn decode_output<T: DeserializeOwned>(raw: &str) -> Result<T, InterpretError> {
    let candidate = extract_json_object(raw).ok_or(InterpretError::NoJsonObject)?;
    serde_json::from_str(candidate).map_err(|e| match e.classify() {
        Category::Data => InterpretError::SchemaMismatch(e.to_string()),
        _ => InterpretError::InvalidJson(e.to_string()),
    })
}

async fn run_flow<C: Serialize, T: DeserializeOwned>(
    provider: &dyn Provider,
    template: &str,
    context: &C,
) -> FlowResult<T> {
    let prompt = load_prompt_file(template, context)?;
    let raw = provider
        .generate_text(&prompt)
        .await
        .map_err(FlowError::Provider)?;
    let output = decode_output(&raw).map_err(|e| {
        tracing::warn!(template, error = %e, "flow output could not be decoded");
        e
    })?;
    Ok(output)
}

fn require_non_blank(field: &str, value: &str) -> FlowResult<()> {
    if value.trim().is_empty() {
        return Err(FlowError::InvalidRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}
