//! Model identifier value object

use serde::{Deserialize, Serialize};

/// Identifier of a model participating in a job (Value Object)
///
/// Chorus is provider-agnostic: identifiers are handed to the configured
/// invoker unmodified, so any string a backend understands is a valid id
/// (e.g. `"@cf/meta/llama-3.1-8b-instruct"` or `"claude-sonnet-4.5"`).
///
/// # Example
///
/// ```
/// use chorus_domain::ModelId;
///
/// let model = ModelId::new("claude-sonnet-4.5");
/// assert_eq!(model.as_str(), "claude-sonnet-4.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Create a new model identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get a short display name for the model
    ///
    /// E.g., "claude-sonnet-4.5" -> "claude"
    pub fn short_name(&self) -> &str {
        self.0.split(['-', '_', '/']).next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelId {
    fn from(s: &str) -> Self {
        ModelId::new(s)
    }
}

impl From<String> for ModelId {
    fn from(s: String) -> Self {
        ModelId::new(s)
    }
}
