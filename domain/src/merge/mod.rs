//! Merge Engine
//!
//! Combines a set of structured judgements into one [`MergedResult`] under a
//! [`Strategy`]. Merging is pure and deterministic: identical inputs always
//! produce identical results, and no input can make it fail.
//!
//! # Strategies
//!
//! - [`Strategy::Consensus`]: per-intent confidence sums decide a winning
//!   intent; its supporters contribute the summary sentences
//! - [`Strategy::Cooperative`]: summaries concatenate in request order and
//!   the last response, presumed to have seen all prior context, decides
//!   the intent

mod consensus;
mod cooperative;

use crate::classify::{Intent, StructuredResponse};
use crate::core::model::ModelId;
use crate::core::strategy::Strategy;
use serde::{Deserialize, Serialize};

/// Single combined answer produced from a set of model judgements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedResult {
    /// The merged answer text
    pub summary: String,
    /// Winning (consensus) or final (cooperative) intent
    pub intent: Intent,
    /// Aggregate confidence, rounded to 3 decimals
    pub confidence: f64,
    /// Whether the caller should re-ask with more detail
    pub needs_clarification: bool,
    /// Models whose responses contributed to the summary
    pub supporting_models: Vec<ModelId>,
    /// Every judgement that went into the merge, in request order
    pub responses: Vec<StructuredResponse>,
}

impl MergedResult {
    /// Zero-value result for an empty response set.
    fn empty() -> Self {
        Self {
            summary: String::new(),
            intent: Intent::Unknown,
            confidence: 0.0,
            needs_clarification: false,
            supporting_models: Vec::new(),
            responses: Vec::new(),
        }
    }

    /// Decode the merged summary as typed JSON.
    ///
    /// The merge pipeline never requires structured output; callers that
    /// prompt their models for JSON can opt into a typed view here.
    pub fn parse_summary_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.summary)
    }
}

/// Merge a set of structured judgements into a single result.
///
/// An empty input yields the zero result (`confidence` 0, `unknown` intent,
/// empty summary and supporting models) for either strategy.
pub fn merge(strategy: Strategy, responses: Vec<StructuredResponse>) -> MergedResult {
    if responses.is_empty() {
        return MergedResult::empty();
    }

    match strategy {
        Strategy::Consensus => consensus::merge(responses),
        Strategy::Cooperative => cooperative::merge(responses),
    }
}
