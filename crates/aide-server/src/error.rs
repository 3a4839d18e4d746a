use aide::errors::FlowError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Map a config field onto the environment variable that sets it.
///
/// Serde only reports the leaf name of a missing field, so leaves that live
/// under `provider` are qualified here.
pub fn to_env_var(field: &str) -> String {
    let path = match field {
        "type" | "api_key" => format!("provider.{}", field),
        other => other.to_string(),
    };
    format!("AIDE_{}", path.replace('.', "__").to_uppercase())
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error(transparent)]
    Flow(#[from] FlowError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(rejection) => rejection.status(),
            ApiError::Flow(FlowError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            ApiError::Flow(FlowError::TooLong { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Flow(FlowError::Provider(_)) | ApiError::Flow(FlowError::Interpret(_)) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Flow(FlowError::Template(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:#}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("api_key"), "AIDE_PROVIDER__API_KEY");
        assert_eq!(to_env_var("type"), "AIDE_PROVIDER__TYPE");
        assert_eq!(to_env_var("server.port"), "AIDE_SERVER__PORT");
    }

    #[test]
    fn test_flow_error_status() {
        let err = ApiError::from(FlowError::TooLong { len: 300, limit: 280 });
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = ApiError::from(FlowError::Provider(anyhow::anyhow!("timed out")));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
