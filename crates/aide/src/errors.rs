use thiserror::Error;

/// Why a model response could not be interpreted
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    #[error("No JSON object found in model output")]
    NoJsonObject,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Output does not match the expected schema: {0}")]
    SchemaMismatch(String),
}

/// Failures of the content generation flows, surfaced to the caller
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to render prompt: {0}")]
    Template(#[from] tera::Error),

    #[error("Provider request failed: {0}")]
    Provider(#[source] anyhow::Error),

    #[error("Could not interpret model output: {0}")]
    Interpret(#[from] InterpretError),

    #[error("Generated text is {len} characters, over the {limit} character limit")]
    TooLong { len: usize, limit: usize },
}

pub type FlowResult<T> = Result<T, FlowError>;
