//! Inconsistency detection over the extracted fact list.
//!
//! Serializes the facts into a fixed instruction prompt, sends it to a
//! generative model, and parses the reply into issues. The model client sits
//! behind a trait so the detector can be exercised with a stub.

pub mod client;
pub mod detector;
pub mod prompt;

pub use client::{GeminiClient, ModelClient, DEFAULT_MODEL};
pub use detector::{Detection, Detector};
pub use prompt::build_prompt;

use thiserror::Error;

/// Errors from the detection stage.
///
/// A reply that arrives but does not parse as an issue list is NOT an error;
/// that case is [`Detection::Inconclusive`].
#[derive(Error, Debug)]
pub enum DetectError {
    /// Transport-level failure talking to the model service.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The model service returned a non-success status.
    #[error("Model API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The reply carried no text part to parse.
    #[error("Model reply contained no text part")]
    EmptyReply,

    /// The fact list could not be serialized into the prompt.
    #[error("Failed to serialize facts: {0}")]
    Prompt(#[from] serde_json::Error),
}
