//! Merge strategy value object

use serde::{Deserialize, Serialize};

/// How responses from multiple models are combined into one answer
///
/// - **Consensus** (default): every model is invoked independently and in
///   parallel; the answer is formed by intent-weighted majority.
/// - **Cooperative**: models are invoked one after another in request order;
///   each invocation sees the outputs of all prior models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Consensus,
    Cooperative,
}

impl Strategy {
    /// Get the string identifier for this strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Consensus => "consensus",
            Strategy::Cooperative => "cooperative",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
