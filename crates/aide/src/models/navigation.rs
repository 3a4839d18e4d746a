use serde::{Deserialize, Serialize};

pub const EMAIL_COMPOSE_PATH: &str = "/email/compose";
pub const CALENDAR_PATH: &str = "/calendar";

/// How a target's params reach the destination view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamCarry {
    /// Encoded into the URL query string
    Query,
    /// Handed to the view alongside the path, never part of the URL
    State,
}

/// Where the UI should go, and what it should prefill once there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTarget {
    pub path: String,
    pub params: Vec<(String, String)>,
    pub carry: ParamCarry,
}

impl NavigationTarget {
    pub fn new<S: Into<String>>(path: S, carry: ParamCarry) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
            carry,
        }
    }

    /// Add a param only when a value is present
    pub fn with_param(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.params.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The URL to navigate to. Query targets carry their params URL-encoded.
    pub fn href(&self) -> String {
        if self.carry == ParamCarry::State || self.params.is_empty() {
            return self.path.clone();
        }

        let query = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}
