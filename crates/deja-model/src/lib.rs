//! Language model service client.
//!
//! Defines the [`LanguageModel`] trait consumed by the answer workflow and
//! a Gemini REST implementation over ureq. Every call is stateless: no
//! streaming, no conversation context, no caller-imposed timeout.

pub mod error;
pub mod gemini;
pub mod service;

pub use error::ModelError;
pub use gemini::GeminiClient;
pub use service::{summarize_prompt, LanguageModel};
