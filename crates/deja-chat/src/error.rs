//! Error types for the answer workflow.
//!
//! Only two things ever surface to the user: a refused blank question and a
//! failed generation. Store failures are handled inside the workflow (reads
//! fail open toward generation, writes are best-effort).

use deja_model::ModelError;

/// Errors from the answer workflow.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("question cannot be empty")]
    EmptyQuestion,
    #[error("model call failed: {0}")]
    Model(String),
}

impl From<ModelError> for ChatError {
    fn from(err: ModelError) -> Self {
        ChatError::Model(err.to_string())
    }
}
