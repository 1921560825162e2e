//! Driving the model and parsing its reply into a detection outcome.

use crate::client::ModelClient;
use crate::prompt::build_prompt;
use crate::DetectError;
use deckcheck_core::{Fact, Issue};
use regex::Regex;
use std::sync::LazyLock;

/// Regex matching a reply wrapped in a fenced code block, with an optional
/// language tag after the opening fence.
static FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```\s*$").unwrap());

/// Outcome of one detection round trip.
///
/// `Inconclusive` is the redesign of the original behavior that silently
/// treated an unparseable reply as "no issues": the raw reply is carried so
/// callers can tell "model found nothing" from "reply was malformed".
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// The reply parsed as an issue list (possibly empty).
    Issues(Vec<Issue>),
    /// The reply did not parse as an issue list; `raw` is the reply text.
    Inconclusive { raw: String },
}

impl Detection {
    /// The issues, with `Inconclusive` collapsing to none.
    pub fn into_issues(self) -> Vec<Issue> {
        match self {
            Detection::Issues(issues) => issues,
            Detection::Inconclusive { .. } => Vec::new(),
        }
    }
}

/// Runs the fact list through a model client and parses the verdict.
pub struct Detector<C> {
    client: C,
}

impl<C: ModelClient> Detector<C> {
    /// Create a detector over the given client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Ask the model for contradictions across `facts`.
    ///
    /// Errors are transport/serialization failures only; a malformed reply
    /// comes back as `Detection::Inconclusive`.
    pub fn detect(&self, facts: &[Fact]) -> Result<Detection, DetectError> {
        let prompt = build_prompt(facts)?;
        let reply = self.client.generate(&prompt)?;
        Ok(parse_reply(&reply))
    }
}

/// Strip a surrounding fenced code block, if any, and parse the reply as an
/// issue list.
pub fn parse_reply(reply: &str) -> Detection {
    let cleaned = strip_code_fence(reply.trim());
    match serde_json::from_str::<Vec<Issue>>(cleaned) {
        Ok(issues) => Detection::Issues(issues),
        Err(e) => {
            log::warn!("Model reply did not parse as an issue list: {}", e);
            Detection::Inconclusive {
                raw: reply.to_string(),
            }
        }
    }
}

/// Remove a leading/trailing code fence (and optional language tag) from a
/// trimmed reply. Text without a surrounding fence is returned unchanged.
fn strip_code_fence(text: &str) -> &str {
    FENCE_REGEX
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text)
}
