//! Reply rendering for the read-only output region.
//!
//! Echoes the question, then the answer body, then a one-line source
//! marker: which model produced the text, or which stored exchange it came
//! from (with the record's timestamp, or a placeholder when the row has
//! none).

use deja_core::types::AnswerSource;

use crate::error::ChatError;
use crate::workflow::Reply;

/// Render a resolved reply for display.
pub fn format_reply(question: &str, reply: &Reply, model_label: &str) -> String {
    let marker = match reply.source {
        AnswerSource::Generated => format!("[deja · {model_label}]"),
        AnswerSource::Cached => {
            let when = reply
                .matches
                .first()
                .map(|r| r.created_at_display())
                .unwrap_or_default();
            format!("[deja · cached {when}]")
        }
    };

    let mut out = format!("Q: {question}\n\n{}\n\n{marker}", reply.answer);
    if reply.matches.len() > 1 {
        out.push_str(&format!(
            "\n(+{} more stored matches)",
            reply.matches.len() - 1
        ));
    }
    out
}

/// Render a failed generation inline; the question stays visible so it can
/// be resubmitted.
pub fn format_error(question: &str, err: &ChatError) -> String {
    format!("Q: {question}\n\nerror: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use deja_core::types::ConversationRecord;
    use uuid::Uuid;

    fn record(answer: &str, dated: bool) -> ConversationRecord {
        ConversationRecord {
            id: Uuid::new_v4(),
            question: "q".to_string(),
            answer: answer.to_string(),
            created_at: dated.then(|| Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_format_generated_reply() {
        let reply = Reply {
            answer: "Paris is the capital of France.".to_string(),
            source: AnswerSource::Generated,
            matches: vec![],
        };
        let out = format_reply("What is the capital of France?", &reply, "gemini-2.5-flash");
        assert!(out.starts_with("Q: What is the capital of France?"));
        assert!(out.contains("Paris is the capital of France."));
        assert!(out.contains("[deja · gemini-2.5-flash]"));
    }

    #[test]
    fn test_format_cached_reply_shows_timestamp() {
        let reply = Reply {
            answer: "Paris.".to_string(),
            source: AnswerSource::Cached,
            matches: vec![record("Paris.", true)],
        };
        let out = format_reply("capital France", &reply, "gemini-2.5-flash");
        assert!(out.contains("[deja · cached 2026-05-01 12:00:00]"));
        assert!(!out.contains("gemini-2.5-flash]"));
    }

    #[test]
    fn test_format_cached_reply_placeholder_timestamp() {
        let reply = Reply {
            answer: "Paris.".to_string(),
            source: AnswerSource::Cached,
            matches: vec![record("Paris.", false)],
        };
        let out = format_reply("capital France", &reply, "gemini-2.5-flash");
        assert!(out.contains("[deja · cached (unknown time)]"));
    }

    #[test]
    fn test_format_cached_reply_counts_extra_matches() {
        let reply = Reply {
            answer: "Paris.".to_string(),
            source: AnswerSource::Cached,
            matches: vec![
                record("Paris.", true),
                record("Paris again.", true),
                record("Still Paris.", false),
            ],
        };
        let out = format_reply("capital France", &reply, "m");
        assert!(out.contains("(+2 more stored matches)"));
    }

    #[test]
    fn test_format_error_keeps_question_visible() {
        let out = format_error(
            "What is the capital of France?",
            &ChatError::Model("connection refused".to_string()),
        );
        assert!(out.contains("Q: What is the capital of France?"));
        assert!(out.contains("error: model call failed: connection refused"));
    }
}
