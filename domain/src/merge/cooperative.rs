//! Cooperative merge: later responses build on earlier context.

use super::MergedResult;
use crate::classify::{Intent, StructuredResponse};
use crate::util::round_dp;

/// Callers guarantee `responses` is non-empty.
///
/// The last response in the chain has seen every prior output, so it decides
/// the intent; the summary is the ordered concatenation of all non-empty
/// summaries.
pub(super) fn merge(responses: Vec<StructuredResponse>) -> MergedResult {
    let last = responses.len() - 1;
    let intent = responses[last].intent;

    let joined = responses
        .iter()
        .map(|r| r.summary.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let summary = if joined.is_empty() {
        responses[last].summary.clone()
    } else {
        joined
    };

    let confidence = round_dp(
        responses.iter().map(|r| r.confidence).sum::<f64>() / responses.len() as f64,
        3,
    );
    let supporting_models = responses.iter().map(|r| r.model.clone()).collect();

    MergedResult {
        summary,
        intent,
        confidence,
        needs_clarification: intent == Intent::Clarification,
        supporting_models,
        responses,
    }
}
