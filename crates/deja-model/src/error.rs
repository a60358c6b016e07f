//! Error types for the language model service.

use deja_core::error::DejaError;

/// Errors from the model client.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The configured environment variable holds no API key. Fatal for the
    /// session; reported once at startup.
    #[error("credential missing: environment variable {0} is not set")]
    MissingCredential(String),
    #[error("transport error: {0}")]
    Http(String),
    #[error("service returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("service returned no candidates")]
    EmptyResponse,
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<ModelError> for DejaError {
    fn from(err: ModelError) -> Self {
        DejaError::Model(err.to_string())
    }
}
