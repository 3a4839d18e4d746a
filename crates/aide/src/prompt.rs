use chrono::NaiveDate;
use serde::Serialize;
use tera::Error as TeraError;

use crate::models::chat::ChatTurn;
use crate::prompt_template::load_prompt_file;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Everything the intent prompt is built from
#[derive(Debug, Clone, Serialize)]
pub struct IntentPromptContext<'a> {
    pub message: &'a str,
    pub image_ref: Option<&'a str>,
    pub today: NaiveDate,
    pub history: &'a [ChatTurn],
}

impl<'a> IntentPromptContext<'a> {
    pub fn new(message: &'a str, today: NaiveDate) -> Self {
        Self {
            message,
            image_ref: None,
            today,
            history: &[],
        }
    }

    pub fn with_image_ref(mut self, image_ref: Option<&'a str>) -> Self {
        self.image_ref = image_ref;
        self
    }

    /// Keep only the most recent `limit` turns
    pub fn with_history(mut self, history: &'a [ChatTurn], limit: usize) -> Self {
        let start = history.len().saturating_sub(limit);
        self.history = &history[start..];
        self
    }
}

/// Build the prompt asking the model for either a reply or a tool request
pub fn assemble_intent_prompt(context: &IntentPromptContext<'_>) -> Result<String, TeraError> {
    load_prompt_file("intent.md", context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 28).unwrap()
    }

    #[test]
    fn test_prompt_embeds_message_and_shapes() {
        let context = IntentPromptContext::new("Email Sam about {the} <launch> & party", today());
        let prompt = assemble_intent_prompt(&context).unwrap();

        assert!(prompt.contains("User message: Email Sam about {the} <launch> & party"));
        assert!(prompt.contains(r#"{"reply": "<your answer to the user>"}"#));
        assert!(prompt.contains(r#""action": "navigateToEmailCompose""#));
        assert!(prompt.contains(r#""action": "navigateToCalendar""#));
        assert!(prompt.contains(r#""startTime": "<HH:MM>""#));
        assert!(prompt.contains("Today's date is 2024-07-28."));
        assert!(!prompt.contains("Attached image"));
        assert!(!prompt.contains("Conversation so far"));
    }

    #[test]
    fn test_prompt_includes_image_ref() {
        let context = IntentPromptContext::new("What is this?", today())
            .with_image_ref(Some("https://cdn.example.com/photo.png"));
        let prompt = assemble_intent_prompt(&context).unwrap();

        assert!(prompt.contains("Attached image: https://cdn.example.com/photo.png"));
    }

    #[test]
    fn test_prompt_keeps_recent_history() {
        let history = vec![
            ChatTurn::user("first"),
            ChatTurn::assistant("one"),
            ChatTurn::user("second"),
            ChatTurn::assistant("two"),
        ];
        let context = IntentPromptContext::new("third", today()).with_history(&history, 2);
        let prompt = assemble_intent_prompt(&context).unwrap();

        assert!(prompt.contains("Conversation so far:"));
        assert!(prompt.contains("user: second\nassistant: two\n"));
        assert!(!prompt.contains("user: first"));
    }
}
