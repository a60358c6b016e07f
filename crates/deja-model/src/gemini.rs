//! Gemini REST client.
//!
//! Talks to the `generateContent` endpoint of the Google generative
//! language API. The request is synchronous and carries no timeout: the
//! caller owns the wait.

use serde::{Deserialize, Serialize};
use tracing::debug;

use deja_core::config::ModelConfig;

use crate::error::ModelError;
use crate::service::LanguageModel;

/// Client for the Gemini `generateContent` operation.
pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    /// Build a client with an explicit key (tests, alternate deployments).
    pub fn new(api_key: String, model: String, endpoint: String) -> Self {
        Self {
            api_key,
            model,
            endpoint,
        }
    }

    /// Build a client reading the API key from the environment variable the
    /// config names. A missing or empty variable is a fatal
    /// [`ModelError::MissingCredential`].
    pub fn from_env(config: &ModelConfig) -> Result<Self, ModelError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::MissingCredential(config.api_key_env.clone()))?;

        Ok(Self::new(
            api_key,
            config.model.clone(),
            config.endpoint.clone(),
        ))
    }

    /// The model identifier this client sends.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl LanguageModel for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Calling generateContent");

        let mut response = ureq::post(&self.url())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .send_json(&body)
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => ModelError::Api {
                    status,
                    message: format!("generateContent rejected with HTTP {status}"),
                },
                other => ModelError::Http(other.to_string()),
            })?;

        let parsed: GenerateResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| ModelError::Serialization(e.to_string()))?;

        extract_text(&parsed)
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Concatenate the part texts of the first candidate.
fn extract_text(response: &GenerateResponse) -> Result<String, ModelError> {
    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ModelError::EmptyResponse);
    }
    Ok(text)
}
