//! Consensus merge: intent-weighted majority with a fixed tie-break order.

use super::MergedResult;
use crate::classify::{Intent, StructuredResponse};
use crate::util::{round_dp, split_sentences};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Upper bound on unique sentences in a consensus summary.
const MAX_SUMMARY_SENTENCES: usize = 5;

/// Callers guarantee `responses` is non-empty.
pub(super) fn merge(responses: Vec<StructuredResponse>) -> MergedResult {
    let intent = winning_intent(&responses);

    let mut winners: Vec<&StructuredResponse> =
        responses.iter().filter(|r| r.intent == intent).collect();
    // Stable sort: equal confidences keep request order
    winners.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal));

    let summary = [
        build_summary(&winners),
        winners.first().map(|r| r.summary.clone()).unwrap_or_default(),
        responses[0].summary.clone(),
    ]
    .into_iter()
    .find(|s| !s.is_empty())
    .unwrap_or_default();

    let confidence = round_dp(
        winners.iter().map(|r| r.confidence).sum::<f64>() / winners.len().max(1) as f64,
        3,
    );
    let supporting_models = winners.iter().map(|r| r.model.clone()).collect();

    MergedResult {
        summary,
        intent,
        confidence,
        needs_clarification: intent == Intent::Clarification,
        supporting_models,
        responses,
    }
}

/// Intent with the highest accumulated confidence; ties fall to the higher
/// [`Intent::priority`].
fn winning_intent(responses: &[StructuredResponse]) -> Intent {
    let mut scores: Vec<(Intent, f64)> = Vec::new();
    for response in responses {
        match scores.iter_mut().find(|(intent, _)| *intent == response.intent) {
            Some((_, score)) => *score += response.confidence,
            None => scores.push((response.intent, response.confidence)),
        }
    }

    scores.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.0.priority().cmp(&a.0.priority()))
    });

    scores.first().map(|(intent, _)| *intent).unwrap_or(Intent::Answer)
}

/// Scan winners' summaries in confidence order, keeping each sentence once
/// (case-insensitive), up to [`MAX_SUMMARY_SENTENCES`]. Falls back to the
/// top winner's summary when no sentences were found at all.
fn build_summary(winners: &[&StructuredResponse]) -> String {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    for winner in winners {
        for sentence in split_sentences(&winner.summary) {
            if seen.insert(sentence.to_lowercase()) {
                ordered.push(sentence);
            }
        }
    }

    if ordered.is_empty() {
        return winners.first().map(|r| r.summary.clone()).unwrap_or_default();
    }

    ordered.truncate(MAX_SUMMARY_SENTENCES);
    ordered.join(" ")
}
