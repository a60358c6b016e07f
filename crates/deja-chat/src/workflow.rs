//! Answer resolution: retrieve from the store, or generate and persist.
//!
//! One user request runs to completion before the next is accepted:
//! retrieval attempt, then possibly a model call, then possibly a
//! best-effort insert. Nothing here retries and nothing here is fatal
//! except a failed generation, which the caller reports inline.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::{debug, info, warn};

use deja_core::config::RetrievalConfig;
use deja_core::error::DejaError;
use deja_core::types::{AnswerSource, ConversationRecord};
use deja_lexicon::{overlap_ratio, NounExtractor};
use deja_model::{summarize_prompt, LanguageModel};
use deja_store::ConversationRepository;

use crate::error::ChatError;

/// Maximum length, in characters, of a summarized or truncated answer
/// persisted after a capacity failure.
pub const SUMMARY_CHAR_LIMIT: usize = 500;

/// The outcome of one resolved question.
#[derive(Debug, Clone)]
pub struct Reply {
    /// The text shown to the user. For cached replies this is the first
    /// matching record's answer; for generated replies it is always the
    /// full model output, regardless of what persistence later did.
    pub answer: String,
    pub source: AnswerSource,
    /// All stored records that cleared the overlap threshold, in store
    /// order. Empty for generated replies.
    pub matches: Vec<ConversationRecord>,
}

/// Coordinates store retrieval, model generation, and persistence.
pub struct AnswerWorkflow<M: LanguageModel> {
    repo: ConversationRepository,
    model: M,
    extractor: NounExtractor,
    overlap_threshold: f64,
}

impl<M: LanguageModel> AnswerWorkflow<M> {
    pub fn new(repo: ConversationRepository, model: M, retrieval: &RetrievalConfig) -> Self {
        Self {
            repo,
            model,
            extractor: NounExtractor::new(retrieval.min_token_chars),
            overlap_threshold: retrieval.overlap_threshold,
        }
    }

    /// The underlying repository (history listing, status).
    pub fn repository(&self) -> &ConversationRepository {
        &self.repo
    }

    /// Resolve one question: answer from the store when a prior exchange
    /// overlaps strongly enough, otherwise generate and persist.
    pub fn ask(&self, question: &str) -> Result<Reply, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }

        if let Some(matches) = self.retrieve(question) {
            info!(matches = matches.len(), "Answered from store");
            let answer = matches[0].answer.clone();
            return Ok(Reply {
                answer,
                source: AnswerSource::Cached,
                matches,
            });
        }

        let answer = self.model.generate(question)?;
        self.persist_best_effort(question, &answer);

        Ok(Reply {
            answer,
            source: AnswerSource::Generated,
            matches: Vec::new(),
        })
    }

    /// Retrieval attempt: `None` is a definitive miss.
    ///
    /// A store read failure is logged and treated as a miss so the request
    /// falls through to generation; it never reaches the user.
    fn retrieve(&self, question: &str) -> Option<Vec<ConversationRecord>> {
        let keywords = self.extractor.keywords_or_fallback(question);
        if keywords.is_empty() {
            return None;
        }
        let query_set: BTreeSet<String> = keywords.iter().cloned().collect();

        let candidates = match self.repo.search_any(&keywords) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Store read failed; falling through to generation");
                return None;
            }
        };

        debug!(
            keywords = keywords.len(),
            candidates = candidates.len(),
            "Retrieval candidates"
        );

        let matched: Vec<ConversationRecord> = candidates
            .into_iter()
            .filter(|record| {
                let mut record_set = self.extractor.nouns(&record.question);
                record_set.extend(self.extractor.nouns(&record.answer));
                overlap_ratio(&query_set, &record_set) >= self.overlap_threshold
            })
            .collect();

        if matched.is_empty() {
            None
        } else {
            Some(matched)
        }
    }

    /// Persist a fresh exchange. Never fails the request: a capacity error
    /// gets one summarize-then-truncate recovery, anything else is logged
    /// and swallowed.
    fn persist_best_effort(&self, question: &str, answer: &str) {
        let now = Utc::now();
        match self.repo.insert(question, answer, Some(now)) {
            Ok(_) => {}
            Err(DejaError::CapacityExceeded { len, capacity }) => {
                info!(len, capacity, "Answer over store capacity; summarizing");
                let recovered = match self
                    .model
                    .generate(&summarize_prompt(answer, SUMMARY_CHAR_LIMIT))
                {
                    Ok(summary) => clamp_chars(&summary, SUMMARY_CHAR_LIMIT),
                    Err(e) => {
                        warn!(error = %e, "Summarization failed; truncating original answer");
                        clamp_chars(answer, SUMMARY_CHAR_LIMIT)
                    }
                };
                if let Err(e) = self.repo.insert(question, &recovered, Some(now)) {
                    warn!(error = %e, "Failed to persist summarized exchange");
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist exchange");
            }
        }
    }
}

/// Truncate to at most `limit` characters, respecting char boundaries.
/// A no-op for text already within the limit.
pub fn clamp_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        text.chars().take(limit).collect()
    }
}
