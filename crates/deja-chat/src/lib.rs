//! The answer resolution workflow.
//!
//! Coordinates the three collaborators: the conversation store (retrieval
//! by noun overlap), the language model service (generation on a miss),
//! and best-effort persistence of fresh answers.

pub mod error;
pub mod response;
pub mod workflow;

pub use error::ChatError;
pub use response::{format_error, format_reply};
pub use workflow::{clamp_chars, AnswerWorkflow, Reply, SUMMARY_CHAR_LIMIT};
