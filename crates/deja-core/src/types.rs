//! Domain types shared across the deja crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder rendered when a record has no stored timestamp.
pub const MISSING_TIMESTAMP: &str = "(unknown time)";

/// One stored question/answer exchange.
///
/// Records are append-only: created on every successful model round trip,
/// never updated or deleted. Duplicates are permitted and accumulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    /// Nullable in the store; older rows may lack it.
    pub created_at: Option<DateTime<Utc>>,
}

impl ConversationRecord {
    /// Render the creation timestamp, substituting a placeholder when absent.
    pub fn created_at_display(&self) -> String {
        match self.created_at {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => MISSING_TIMESTAMP.to_string(),
        }
    }
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerSource {
    /// Served from a stored exchange; the model was not invoked.
    Cached,
    /// Freshly generated by the language model service.
    Generated,
}
