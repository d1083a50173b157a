use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Generation failed: {0}")]
    GenerationFailure(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ProviderError(_) => "PROVIDER_ERROR",
            AppError::SchemaError(_) => "SCHEMA_ERROR",
            AppError::GenerationFailure(_) => "GENERATION_FAILURE",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::ConfigError(_) => "CONFIG_ERROR",
        }
    }

    /// Collapses provider and schema failures into the single user-facing
    /// failure surfaced by tutorial and quiz generation.
    pub fn into_generation_failure(self) -> AppError {
        match self {
            AppError::GenerationFailure(_) => self,
            other => AppError::GenerationFailure(other.to_string()),
        }
    }

    /// Whether re-invoking the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::ProviderError(_) | AppError::SchemaError(_) | AppError::GenerationFailure(_)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub retryable: bool,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        ErrorResponse {
            error: err.to_string(),
            code: err.error_code(),
            retryable: err.is_retryable(),
        }
    }
}

impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::ProviderError(err.to_string())
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SchemaError(format!("Malformed JSON payload: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
