//! Model clients: the trait seam and the Gemini implementation.

use crate::DetectError;

/// Default Gemini model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// A generative model that turns a prompt into a text completion.
pub trait ModelClient {
    /// Send `prompt` and return the model's text reply.
    fn generate(&self, prompt: &str) -> Result<String, DetectError>;
}

/// Blocking client for the Google AI `generateContent` endpoint.
///
/// The API key is threaded in at construction; the key travels as a URL
/// query parameter, not a header.
pub struct GeminiClient {
    api_key: String,
    model: String,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Create a client for the given credential and model identifier.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// The model identifier this client targets.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ModelClient for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, DetectError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        log::debug!("Sending {} prompt chars to {}", prompt.len(), self.model);

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "contents": [
                    {
                        "role": "user",
                        "parts": [
                            {
                                "text": prompt
                            }
                        ]
                    }
                ]
            }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DetectError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json()?;
        extract_reply_text(&json).ok_or(DetectError::EmptyReply)
    }
}

/// Pull the reply text out of a `generateContent` response.
///
/// Gemini format: `candidates[0].content.parts[0].text`.
fn extract_reply_text(json: &serde_json::Value) -> Option<String> {
    json.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_reply_text() {
        let json: serde_json::Value = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"[]"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_reply_text(&json), Some("[]".to_string()));
    }

    #[test]
    fn test_extract_reply_text_missing_parts() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(extract_reply_text(&json), None);
    }
}
