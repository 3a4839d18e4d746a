//! Turns raw model output into an [`Interpretation`].
//!
//! The JSON candidate is everything from the first `{` to the last `}` of the
//! output. Prose around a single object is tolerated; several objects, or braces
//! inside the surrounding prose, make the candidate invalid and the caller gets
//! the fallback reply rather than a guess.
use serde::Deserialize;
use serde_json::error::Category;

use crate::errors::InterpretError;
use crate::models::intent::{AssistantReply, Interpretation, ToolRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    tool_request: Option<ToolRequest>,
}

/// The slice from the first `{` to the last `}` inclusive, if there is one
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

pub fn try_parse_model_output(raw: &str) -> Result<Interpretation, InterpretError> {
    let candidate = extract_json_object(raw).ok_or(InterpretError::NoJsonObject)?;

    let envelope: Envelope = serde_json::from_str(candidate).map_err(|e| match e.classify() {
        Category::Data => InterpretError::SchemaMismatch(e.to_string()),
        _ => InterpretError::InvalidJson(e.to_string()),
    })?;

    match (envelope.reply, envelope.tool_request) {
        (Some(reply), None) => Ok(Interpretation::Reply(AssistantReply::new(reply))),
        (None, Some(request)) => Ok(Interpretation::Tool(request)),
        (Some(_), Some(_)) => Err(InterpretError::SchemaMismatch(
            "both reply and toolRequest are present".to_string(),
        )),
        (None, None) => Err(InterpretError::SchemaMismatch(
            "neither reply nor toolRequest is present".to_string(),
        )),
    }
}

/// Like [`try_parse_model_output`], but any failure becomes the fallback reply
pub fn parse_model_output(raw: &str) -> Interpretation {
    try_parse_model_output(raw).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "falling back on uninterpretable model output");
        Interpretation::fallback()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::intent::{CalendarParams, EmailComposeParams, FALLBACK_REPLY};

    #[test]
    fn test_plain_reply() {
        let interpretation = parse_model_output(r#"{"reply": "Hello there!"}"#);
        assert_eq!(interpretation.as_reply(), Some("Hello there!"));
    }

    #[test]
    fn test_reply_wrapped_in_prose_and_fences() {
        let raw = "Here you go:\n```json\n{\"reply\": \"It's 5 o'clock somewhere\"}\n```";
        let interpretation = parse_model_output(raw);
        assert_eq!(interpretation.as_reply(), Some("It's 5 o'clock somewhere"));
    }

    #[test]
    fn test_reply_text_containing_braces_survives() {
        let raw = r#"{"reply": "Use {name} as the placeholder"}"#;
        let interpretation = parse_model_output(raw);
        assert_eq!(interpretation.as_reply(), Some("Use {name} as the placeholder"));
    }

    #[test]
    fn test_calendar_request_inside_prose() {
        let raw = r#"Sure! {"toolRequest":{"action":"navigateToCalendar","params":{"date":"2024-07-29","summary":"Dentist"}}} Hope that helps!"#;
        let interpretation = parse_model_output(raw);
        assert_eq!(
            interpretation,
            Interpretation::Tool(ToolRequest::NavigateToCalendar(CalendarParams {
                date: Some("2024-07-29".to_string()),
                summary: Some("Dentist".to_string()),
                start_time: None,
            }))
        );
    }

    #[test]
    fn test_email_request() {
        let raw = r#"{"toolRequest": {"action": "navigateToEmailCompose", "params": {"to": "kim@example.com", "body": "Running late"}}}"#;
        let interpretation = parse_model_output(raw);
        assert_eq!(
            interpretation.as_tool_request(),
            Some(&ToolRequest::NavigateToEmailCompose(EmailComposeParams {
                to: Some("kim@example.com".to_string()),
                subject: None,
                body: Some("Running late".to_string()),
            }))
        );
    }

    #[test]
    fn test_unrecognized_action_is_not_a_failure() {
        let raw = r#"{"toolRequest": {"action": "orderPizza", "params": {"size": "large"}}}"#;
        let interpretation = try_parse_model_output(raw).unwrap();
        assert_eq!(
            interpretation,
            Interpretation::Tool(ToolRequest::Unrecognized {
                action: "orderPizza".to_string()
            })
        );
    }

    #[test]
    fn test_no_braces_falls_back() {
        assert_eq!(
            try_parse_model_output("I'm not sure what you mean."),
            Err(InterpretError::NoJsonObject)
        );
        assert_eq!(
            parse_model_output("I'm not sure what you mean.").as_reply(),
            Some(FALLBACK_REPLY)
        );
    }

    #[test]
    fn test_unbalanced_braces_fall_back() {
        assert_eq!(
            try_parse_model_output(r#"{"reply": "cut off"#),
            Err(InterpretError::NoJsonObject)
        );
        assert_eq!(
            try_parse_model_output("} backwards {"),
            Err(InterpretError::NoJsonObject)
        );
        assert!(matches!(
            try_parse_model_output(r#"{"reply": "missing comma" "next": 1}"#),
            Err(InterpretError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_multiple_objects_fall_back() {
        let raw = r#"{"reply": "one"} or maybe {"reply": "two"}"#;
        assert!(matches!(
            try_parse_model_output(raw),
            Err(InterpretError::InvalidJson(_))
        ));
        assert_eq!(parse_model_output(raw), Interpretation::fallback());
    }

    #[test]
    fn test_schema_mismatches_fall_back() {
        let cases = [
            r#"{"answer": "hi"}"#,
            r#"{"reply": 42}"#,
            r#"{"reply": null, "toolRequest": null}"#,
            r#"{"reply": "hi", "toolRequest": {"action": "navigateToCalendar"}}"#,
            r#"{"toolRequest": {"params": {"date": "2024-01-01"}}}"#,
            r#"{"toolRequest": {"action": "navigateToCalendar", "params": {"date": 20240101}}}"#,
            r#"{"toolRequest": "navigateToCalendar"}"#,
        ];
        for raw in cases {
            assert!(
                matches!(
                    try_parse_model_output(raw),
                    Err(InterpretError::SchemaMismatch(_))
                ),
                "expected schema mismatch for {}",
                raw
            );
            assert_eq!(parse_model_output(raw).as_reply(), Some(FALLBACK_REPLY));
        }
    }

    #[test]
    fn test_parsing_is_repeatable() {
        let raw = r#"ok {"toolRequest":{"action":"navigateToEmailCompose","params":{"subject":"Hi"}}}"#;
        assert_eq!(parse_model_output(raw), parse_model_output(raw));
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(extract_json_object("a {b} c"), Some("{b}"));
        assert_eq!(extract_json_object("{x} {y}"), Some("{x} {y}"));
        assert_eq!(extract_json_object("nothing"), None);
        assert_eq!(extract_json_object("only {"), None);
    }
}
