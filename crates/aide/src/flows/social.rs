use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::{require_non_blank, run_flow};
use crate::errors::{FlowError, FlowResult};
use crate::providers::base::Provider;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    Twitter,
    LinkedIn,
    Instagram,
    Facebook,
}

impl Platform {
    /// Maximum post length in characters
    pub fn char_limit(&self) -> usize {
        match self {
            Platform::Twitter => 280,
            Platform::LinkedIn => 3000,
            Platform::Instagram => 2200,
            Platform::Facebook => 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPostRequest {
    pub platform: Platform,
    pub topic: String,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub text: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl SocialPost {
    /// The text as it would be published, hashtags appended
    pub fn rendered(&self) -> String {
        let mut rendered = self.text.trim_end().to_string();
        for tag in &self.hashtags {
            rendered.push_str(" #");
            rendered.push_str(tag.trim_start_matches('#'));
        }
        rendered
    }
}

#[derive(Serialize)]
struct PromptContext<'a> {
    platform: Platform,
    topic: &'a str,
    tone: Option<&'a str>,
    limit: usize,
}

pub async fn social_post(
    provider: &dyn Provider,
    request: &SocialPostRequest,
) -> FlowResult<SocialPost> {
    require_non_blank("topic", &request.topic)?;

    let limit = request.platform.char_limit();
    let context = PromptContext {
        platform: request.platform,
        topic: &request.topic,
        tone: request.tone.as_deref(),
        limit,
    };
    let post: SocialPost = run_flow(provider, "social_post.md", &context).await?;

    // Inclusive: a post of exactly `limit` characters is allowed
    let len = post.rendered().chars().count();
    if len > limit {
        return Err(FlowError::TooLong { len, limit });
    }
    Ok(post)
}
