//! Intent detection over raw model output.

use serde::{Deserialize, Serialize};

/// Phrases that mark a response as refusing the request.
///
/// Checked before anything else: a refusal that politely asks a follow-up
/// question is still a refusal.
const REFUSAL_KEYWORDS: [&str; 7] = [
    "cannot",
    "can't",
    "sorry",
    "unable",
    "not able",
    "refuse",
    "not allowed",
];

/// Phrases that mark a response as asking for clarification.
const CLARIFICATION_KEYWORDS: [&str; 7] = [
    "clarify",
    "clarification",
    "could you provide",
    "can you provide",
    "please specify",
    "need more information",
    "i'm not sure what you're trying",
];

/// Coarse purpose of a model's response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// The model answered the prompt
    Answer,
    /// The model asked for more information
    Clarification,
    /// The model declined to answer
    Refusal,
    /// Nothing usable could be detected (e.g. blank output)
    Unknown,
}

impl Intent {
    /// Tie-break priority when accumulated confidences are equal.
    ///
    /// `answer > clarification > refusal > unknown`
    pub fn priority(&self) -> u8 {
        match self {
            Intent::Answer => 3,
            Intent::Clarification => 2,
            Intent::Refusal => 1,
            Intent::Unknown => 0,
        }
    }

    /// Get the string identifier for this intent
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Answer => "answer",
            Intent::Clarification => "clarification",
            Intent::Refusal => "refusal",
            Intent::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detect the purpose of a raw response.
///
/// Keyword matching is case-insensitive. Refusal cues win over clarification
/// cues; a question mark alone is only a clarification when paired with
/// "please".
pub fn classify_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();

    if REFUSAL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Intent::Refusal;
    }

    if CLARIFICATION_KEYWORDS.iter().any(|kw| lower.contains(kw))
        || (lower.contains('?') && lower.contains("please"))
    {
        return Intent::Clarification;
    }

    if lower.trim().is_empty() {
        return Intent::Unknown;
    }

    Intent::Answer
}
