//! The language model service abstraction.

use crate::error::ModelError;

/// A hosted language model reachable through one stateless operation.
///
/// Each call carries the full prompt; no context is retained between calls.
/// Latency is unbounded and failures are terminal for the request.
pub trait LanguageModel: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Build the recovery prompt asking the model to compress an answer that
/// exceeded the store's column capacity.
pub fn summarize_prompt(answer: &str, limit: usize) -> String {
    format!(
        "Summarize the following answer in at most {limit} characters. \
         Reply with the summary only.\n\n{answer}"
    )
}
