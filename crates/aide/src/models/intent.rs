use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Returned whenever the model output cannot be turned into a reply or a tool request
pub const FALLBACK_REPLY: &str = "Sorry, I could not understand or process your request.";

pub const EMAIL_COMPOSE_ACTION: &str = "navigateToEmailCompose";
pub const CALENDAR_ACTION: &str = "navigateToCalendar";

/// Prefill for the email composer. Absent fields are left to the composer's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailComposeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Prefill for the calendar's event creation form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarParams {
    /// ISO date, e.g. 2024-07-29
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// 24 hour HH:MM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

/// A machine actionable command emitted by the model instead of a reply.
///
/// On the wire this is `{"action": "<name>", "params": {...}}`. Action names
/// outside the known set decode to `Unrecognized` so the dispatcher can log
/// and drop them instead of failing the whole interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawToolRequest", into = "RawToolRequest")]
pub enum ToolRequest {
    NavigateToEmailCompose(EmailComposeParams),
    NavigateToCalendar(CalendarParams),
    Unrecognized { action: String },
}

impl ToolRequest {
    pub fn action(&self) -> &str {
        match self {
            ToolRequest::NavigateToEmailCompose(_) => EMAIL_COMPOSE_ACTION,
            ToolRequest::NavigateToCalendar(_) => CALENDAR_ACTION,
            ToolRequest::Unrecognized { action } => action,
        }
    }
}

/// Wire form of a [`ToolRequest`], before the action name is resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawToolRequest {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl TryFrom<RawToolRequest> for ToolRequest {
    type Error = String;

    fn try_from(raw: RawToolRequest) -> Result<Self, Self::Error> {
        let params = match raw.params {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(params @ Value::Object(_)) => params,
            Some(other) => {
                return Err(format!(
                    "params for {} must be an object, got {}",
                    raw.action, other
                ))
            }
        };

        match raw.action.as_str() {
            EMAIL_COMPOSE_ACTION => serde_json::from_value(params)
                .map(ToolRequest::NavigateToEmailCompose)
                .map_err(|e| format!("invalid {} params: {}", EMAIL_COMPOSE_ACTION, e)),
            CALENDAR_ACTION => serde_json::from_value(params)
                .map(ToolRequest::NavigateToCalendar)
                .map_err(|e| format!("invalid {} params: {}", CALENDAR_ACTION, e)),
            _ => Ok(ToolRequest::Unrecognized {
                action: raw.action.clone(),
            }),
        }
    }
}

impl From<ToolRequest> for RawToolRequest {
    fn from(request: ToolRequest) -> Self {
        let (action, params) = match request {
            ToolRequest::NavigateToEmailCompose(params) => (
                EMAIL_COMPOSE_ACTION.to_string(),
                serde_json::to_value(params).ok(),
            ),
            ToolRequest::NavigateToCalendar(params) => (
                CALENDAR_ACTION.to_string(),
                serde_json::to_value(params).ok(),
            ),
            ToolRequest::Unrecognized { action } => (action, None),
        };
        RawToolRequest { action, params }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub reply: String,
}

impl AssistantReply {
    pub fn new<S: Into<String>>(reply: S) -> Self {
        Self {
            reply: reply.into(),
        }
    }

    pub fn fallback() -> Self {
        Self::new(FALLBACK_REPLY)
    }

    pub fn is_fallback(&self) -> bool {
        self.reply == FALLBACK_REPLY
    }
}

/// The outcome of interpreting one model response: exactly one of a reply or a tool request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Reply(AssistantReply),
    Tool(ToolRequest),
}

impl Interpretation {
    pub fn fallback() -> Self {
        Interpretation::Reply(AssistantReply::fallback())
    }

    pub fn as_reply(&self) -> Option<&str> {
        match self {
            Interpretation::Reply(reply) => Some(&reply.reply),
            Interpretation::Tool(_) => None,
        }
    }

    pub fn as_tool_request(&self) -> Option<&ToolRequest> {
        match self {
            Interpretation::Tool(request) => Some(request),
            Interpretation::Reply(_) => None,
        }
    }

    /// The JSON envelope the model was asked to produce for this interpretation
    pub fn to_envelope(&self) -> Value {
        serde_json::to_value(AssistantResponse::from(self.clone())).unwrap_or(Value::Null)
    }
}

/// What the chat UI receives for a user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_request: Option<ToolRequest>,
}

impl From<Interpretation> for AssistantResponse {
    fn from(interpretation: Interpretation) -> Self {
        match interpretation {
            Interpretation::Reply(reply) => AssistantResponse {
                reply: Some(reply.reply),
                tool_request: None,
            },
            Interpretation::Tool(request) => AssistantResponse {
                reply: None,
                tool_request: Some(request),
            },
        }
    }
}
