//! Run Job use case
//!
//! Orchestrates one inference job: fanout or chain across the requested
//! models, classification of every raw response, and the merge into a
//! single answer, with wall-clock instrumentation around each stage.

use crate::ports::model_invoker::{InvokeError, ModelInvoker};
use chorus_domain::util::round_dp;
use chorus_domain::{MergedResult, ModelId, Prompt, Strategy, StructuredResponse, classify, merge};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur while running a job
#[derive(Error, Debug)]
pub enum RunJobError {
    /// A single model invocation failed. Under consensus this aborts the
    /// whole fanout; under cooperative, the remaining chain. No partial
    /// results are returned either way.
    #[error("Model {model} failed: {source}")]
    ModelFailed {
        model: ModelId,
        #[source]
        source: InvokeError,
    },

    /// An invocation task stopped without reporting a result
    #[error("Invocation task did not complete: {0}")]
    TaskLost(String),
}

/// Input for the RunJob use case
///
/// Validation happens at the service boundary; the orchestrator assumes a
/// non-empty prompt and model list.
#[derive(Debug, Clone)]
pub struct RunJobInput {
    /// The prompt sent to every model
    pub prompt: Prompt,
    /// Models to invoke; order matters for the cooperative strategy
    pub models: Vec<ModelId>,
    /// How the responses are combined
    pub strategy: Strategy,
}

impl RunJobInput {
    pub fn new(prompt: impl Into<Prompt>, models: Vec<ModelId>) -> Self {
        Self {
            prompt: prompt.into(),
            models,
            strategy: Strategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Raw outcome of one model invocation
///
/// Owned by the orchestrator for the lifetime of one job.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInvocationResult {
    /// The model that was invoked
    pub model: ModelId,
    /// The raw text it returned
    pub response: String,
    /// Wall-clock duration of the invocation in milliseconds
    pub duration_ms: f64,
}

/// Wall-clock instrumentation for one job, in milliseconds
///
/// Every span is rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JobTimings {
    /// Whole job, request to merged result
    pub total: f64,
    /// Invocation stage: batch wall-clock span (consensus) or the sum of
    /// sequential durations (cooperative)
    pub fanout: f64,
    /// Longest single invocation
    pub slowest: f64,
    /// Merge stage only
    pub merge: f64,
}

impl JobTimings {
    pub fn new(total: f64, fanout: f64, slowest: f64, merge: f64) -> Self {
        Self {
            total: round_dp(total, 2),
            fanout: round_dp(fanout, 2),
            slowest: round_dp(slowest, 2),
            merge: round_dp(merge, 2),
        }
    }
}

/// Final outcome of a job
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    /// The merged answer text
    pub merged: String,
    /// Per-model invocation results, in request order
    pub invocations: Vec<ModelInvocationResult>,
    /// Structured merge outcome
    pub structured: MergedResult,
    /// Timing instrumentation
    pub timings: JobTimings,
}

/// Use case for running one inference job
///
/// Stateless across requests: every job's intermediate collections are
/// local to one `execute` call, and nothing survives past it.
pub struct RunJobUseCase<I: ModelInvoker + ?Sized + 'static> {
    invoker: Arc<I>,
}

impl<I: ModelInvoker + ?Sized + 'static> RunJobUseCase<I> {
    pub fn new(invoker: Arc<I>) -> Self {
        Self { invoker }
    }

    /// Execute the job and produce the merged result with timings.
    pub async fn execute(&self, input: RunJobInput) -> Result<JobResult, RunJobError> {
        let started = Instant::now();
        info!(
            strategy = %input.strategy,
            models = input.models.len(),
            "Starting job"
        );

        let fanout_started = Instant::now();
        let invocations = match input.strategy {
            Strategy::Consensus => self.fanout_consensus(&input).await?,
            Strategy::Cooperative => self.chain_cooperative(&input).await?,
        };
        let fanout_wall_ms = elapsed_ms(fanout_started);

        let slowest = invocations
            .iter()
            .map(|inv| inv.duration_ms)
            .fold(0.0, f64::max);
        let fanout = match input.strategy {
            Strategy::Consensus => fanout_wall_ms,
            // No parallelism in a chain: the stage is the time spent invoking
            Strategy::Cooperative => invocations.iter().map(|inv| inv.duration_ms).sum(),
        };

        let judgements: Vec<StructuredResponse> = invocations
            .iter()
            .map(|inv| classify(&inv.model, &inv.response))
            .collect();

        let merge_started = Instant::now();
        let structured = merge(input.strategy, judgements);
        let merge_ms = elapsed_ms(merge_started);

        let merged = merged_text(&structured, &invocations);

        let timings = JobTimings::new(elapsed_ms(started), fanout, slowest, merge_ms);
        info!(
            intent = %structured.intent,
            confidence = structured.confidence,
            total_ms = timings.total,
            "Job complete"
        );

        Ok(JobResult {
            merged,
            invocations,
            structured,
            timings,
        })
    }

    /// Invoke every model concurrently, with unbounded fanout.
    ///
    /// Results are keyed back to request order regardless of completion
    /// order. The first failure fails the whole job; dropping the join set
    /// aborts the sibling in-flight invocations.
    async fn fanout_consensus(
        &self,
        input: &RunJobInput,
    ) -> Result<Vec<ModelInvocationResult>, RunJobError> {
        let mut join_set = JoinSet::new();

        for (index, model) in input.models.iter().cloned().enumerate() {
            let invoker = Arc::clone(&self.invoker);
            let prompt = input.prompt.content().to_string();

            join_set.spawn(async move {
                let invocation_started = Instant::now();
                let result = invoker.invoke(&model, &prompt).await;
                (index, model, result, elapsed_ms(invocation_started))
            });
        }

        let mut slots: Vec<Option<ModelInvocationResult>> =
            (0..input.models.len()).map(|_| None).collect();

        while let Some(joined) = join_set.join_next().await {
            let (index, model, result, duration_ms) =
                joined.map_err(|e| RunJobError::TaskLost(e.to_string()))?;

            match result {
                Ok(response) => {
                    debug!(%model, duration_ms, "Model responded");
                    slots[index] = Some(ModelInvocationResult {
                        model,
                        response,
                        duration_ms,
                    });
                }
                Err(source) => {
                    warn!(%model, error = %source, "Model failed, aborting fanout");
                    return Err(RunJobError::ModelFailed { model, source });
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Invoke models strictly in request order; each step's prompt carries
    /// the transcript of all prior outputs.
    async fn chain_cooperative(
        &self,
        input: &RunJobInput,
    ) -> Result<Vec<ModelInvocationResult>, RunJobError> {
        let mut invocations = Vec::with_capacity(input.models.len());
        let mut transcript: Vec<String> = Vec::new();

        for model in &input.models {
            let prompt = chained_prompt(input.prompt.content(), &transcript);

            let invocation_started = Instant::now();
            let response = self
                .invoker
                .invoke(model, &prompt)
                .await
                .map_err(|source| {
                    warn!(%model, error = %source, "Model failed, aborting chain");
                    RunJobError::ModelFailed {
                        model: model.clone(),
                        source,
                    }
                })?;
            let duration_ms = elapsed_ms(invocation_started);

            debug!(%model, duration_ms, "Model responded");
            transcript.push(response.clone());
            invocations.push(ModelInvocationResult {
                model: model.clone(),
                response,
                duration_ms,
            });
        }

        Ok(invocations)
    }
}

/// Prompt for one step of a cooperative chain: the original prompt plus a
/// numbered transcript of all prior outputs.
fn chained_prompt(prompt: &str, transcript: &[String]) -> String {
    if transcript.is_empty() {
        return prompt.to_string();
    }

    let numbered = transcript
        .iter()
        .enumerate()
        .map(|(i, output)| format!("{}. {}", i + 1, output))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{prompt}\n\nPrevious responses:\n{numbered}\n\nBuild on these responses:")
}

/// Merged answer text: the trimmed merged summary, or the first non-empty
/// raw response in invocation order, or the very first response verbatim.
fn merged_text(structured: &MergedResult, invocations: &[ModelInvocationResult]) -> String {
    let summary = structured.summary.trim();
    if !summary.is_empty() {
        return summary.to_string();
    }

    invocations
        .iter()
        .find(|inv| !inv.response.trim().is_empty())
        .or_else(|| invocations.first())
        .map(|inv| inv.response.clone())
        .unwrap_or_default()
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chorus_domain::Intent;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    // -- Scripted ModelInvoker -------------------------------------------------

    /// Invoker with a canned response, failure or delay per model id.
    #[derive(Default)]
    struct ScriptedInvoker {
        responses: HashMap<String, Result<String, String>>,
        delays_ms: HashMap<String, u64>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedInvoker {
        fn new() -> Self {
            Self::default()
        }

        fn respond(mut self, model: &str, text: &str) -> Self {
            self.responses.insert(model.to_string(), Ok(text.to_string()));
            self
        }

        fn fail(mut self, model: &str, message: &str) -> Self {
            self.responses
                .insert(model.to_string(), Err(message.to_string()));
            self
        }

        fn delay(mut self, model: &str, ms: u64) -> Self {
            self.delays_ms.insert(model.to_string(), ms);
            self
        }

        fn seen_prompts(&self) -> Vec<(String, String)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelInvoker for ScriptedInvoker {
        async fn invoke(&self, model: &ModelId, prompt: &str) -> Result<String, InvokeError> {
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string()));

            if let Some(ms) = self.delays_ms.get(model.as_str()) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }

            match self.responses.get(model.as_str()) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(message)) => Err(InvokeError::RequestFailed(message.clone())),
                None => Err(InvokeError::ModelNotAvailable(model.to_string())),
            }
        }
    }

    fn models(ids: &[&str]) -> Vec<ModelId> {
        ids.iter().map(|id| ModelId::new(*id)).collect()
    }

    // -- Consensus -------------------------------------------------------------

    #[tokio::test]
    async fn consensus_answer_outweighs_refusal() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond("m1", "I cannot help with that.")
                .respond("m2", "Sure, here is the answer: 42."),
        );
        let use_case = RunJobUseCase::new(invoker);

        let result = use_case
            .execute(RunJobInput::new("What is the answer?", models(&["m1", "m2"])))
            .await
            .unwrap();

        assert_eq!(result.structured.intent, Intent::Answer);
        assert_eq!(result.structured.supporting_models, models(&["m2"]));
        assert_eq!(result.merged, "Sure, here is the answer: 42.");
        assert_eq!(result.invocations.len(), 2);
    }

    #[tokio::test]
    async fn consensus_preserves_request_order_despite_completion_order() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond("slow", "Slow answer here.")
                .delay("slow", 40)
                .respond("fast", "Fast answer here."),
        );
        let use_case = RunJobUseCase::new(invoker);

        let result = use_case
            .execute(RunJobInput::new("q", models(&["slow", "fast"])))
            .await
            .unwrap();

        let order: Vec<&str> = result
            .invocations
            .iter()
            .map(|inv| inv.model.as_str())
            .collect();
        assert_eq!(order, vec!["slow", "fast"]);

        let response_order: Vec<&str> = result
            .structured
            .responses
            .iter()
            .map(|r| r.model.as_str())
            .collect();
        assert_eq!(response_order, vec!["slow", "fast"]);
    }

    #[tokio::test]
    async fn consensus_runs_invocations_concurrently() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond("a", "Answer from a.")
                .delay("a", 50)
                .respond("b", "Answer from b.")
                .delay("b", 50),
        );
        let use_case = RunJobUseCase::new(invoker);

        let result = use_case
            .execute(RunJobInput::new("q", models(&["a", "b"])))
            .await
            .unwrap();

        // Sequential execution would take at least 100ms
        assert!(
            result.timings.fanout < 95.0,
            "fanout {}ms looks sequential",
            result.timings.fanout
        );
        assert!(result.timings.slowest >= 50.0);
    }

    #[tokio::test]
    async fn consensus_fails_fast_when_any_model_fails() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond("m1", "Fine.")
                .fail("m2", "backend exploded")
                .respond("m3", "Also fine."),
        );
        let use_case = RunJobUseCase::new(invoker);

        let error = use_case
            .execute(RunJobInput::new("q", models(&["m1", "m2", "m3"])))
            .await
            .unwrap_err();

        match &error {
            RunJobError::ModelFailed { model, .. } => assert_eq!(model.as_str(), "m2"),
            other => panic!("expected ModelFailed, got {other:?}"),
        }
        assert!(error.to_string().contains("m2"));
    }

    // -- Cooperative -----------------------------------------------------------

    #[tokio::test]
    async fn cooperative_chains_prior_outputs_into_prompts() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond("m1", "First draft.")
                .respond("m2", "Second pass.")
                .respond("m3", "Final polish."),
        );
        let use_case = RunJobUseCase::new(Arc::clone(&invoker));

        use_case
            .execute(
                RunJobInput::new("Write a haiku", models(&["m1", "m2", "m3"]))
                    .with_strategy(Strategy::Cooperative),
            )
            .await
            .unwrap();

        let prompts = invoker.seen_prompts();
        assert_eq!(prompts.len(), 3);

        assert_eq!(prompts[0], ("m1".to_string(), "Write a haiku".to_string()));

        let second = &prompts[1].1;
        assert!(second.starts_with("Write a haiku"));
        assert!(second.contains("Previous responses:\n1. First draft."));
        assert!(second.ends_with("Build on these responses:"));

        let third = &prompts[2].1;
        assert!(third.contains("1. First draft.\n2. Second pass."));
    }

    #[tokio::test]
    async fn cooperative_final_intent_comes_from_last_model() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond("m1", "Here is a solid answer with plenty of detail in it.")
                .respond("m2", "I cannot improve on that.")
                .respond("m3", "Could you provide the target audience, please?"),
        );
        let use_case = RunJobUseCase::new(invoker);

        let result = use_case
            .execute(
                RunJobInput::new("q", models(&["m1", "m2", "m3"]))
                    .with_strategy(Strategy::Cooperative),
            )
            .await
            .unwrap();

        assert_eq!(result.structured.intent, Intent::Clarification);
        assert!(result.structured.needs_clarification);
        assert_eq!(
            result.structured.supporting_models,
            models(&["m1", "m2", "m3"])
        );
    }

    #[tokio::test]
    async fn cooperative_aborts_chain_at_first_failure() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond("m1", "Step one.")
                .fail("m2", "quota exceeded")
                .respond("m3", "Never reached."),
        );
        let use_case = RunJobUseCase::new(Arc::clone(&invoker));

        let error = use_case
            .execute(
                RunJobInput::new("q", models(&["m1", "m2", "m3"]))
                    .with_strategy(Strategy::Cooperative),
            )
            .await
            .unwrap_err();

        assert!(matches!(error, RunJobError::ModelFailed { .. }));

        // m3 must never be invoked after m2 fails
        let invoked: Vec<String> = invoker
            .seen_prompts()
            .into_iter()
            .map(|(model, _)| model)
            .collect();
        assert_eq!(invoked, vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn cooperative_fanout_is_sum_of_durations() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond("m1", "One.")
                .delay("m1", 20)
                .respond("m2", "Two.")
                .delay("m2", 30),
        );
        let use_case = RunJobUseCase::new(invoker);

        let result = use_case
            .execute(
                RunJobInput::new("q", models(&["m1", "m2"]))
                    .with_strategy(Strategy::Cooperative),
            )
            .await
            .unwrap();

        let sum: f64 = result
            .invocations
            .iter()
            .map(|inv| inv.duration_ms)
            .sum();
        assert!((result.timings.fanout - sum).abs() < 0.01);
        assert!(result.timings.slowest >= 30.0);
        assert!(result.timings.slowest <= result.timings.fanout);
        assert!(result.timings.total >= result.timings.fanout);
    }

    // -- Fallbacks and timings -------------------------------------------------

    #[tokio::test]
    async fn merged_text_falls_back_to_first_non_empty_response() {
        // Two blank responses win the vote as `unknown`, leaving an empty
        // merged summary; the refusal text is the first non-empty raw
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond("m1", "   ")
                .respond("m2", " \t")
                .respond("m3", "I cannot."),
        );
        let use_case = RunJobUseCase::new(invoker);

        let result = use_case
            .execute(RunJobInput::new("q", models(&["m1", "m2", "m3"])))
            .await
            .unwrap();

        assert_eq!(result.structured.intent, Intent::Unknown);
        assert!(result.structured.summary.is_empty());
        assert_eq!(result.merged, "I cannot.");
    }

    #[tokio::test]
    async fn merged_text_final_fallback_is_first_response_verbatim() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .respond("m1", "   ")
                .respond("m2", ""),
        );
        let use_case = RunJobUseCase::new(invoker);

        let result = use_case
            .execute(RunJobInput::new("q", models(&["m1", "m2"])))
            .await
            .unwrap();

        assert_eq!(result.merged, "   ");
    }

    #[tokio::test]
    async fn timings_are_rounded_to_two_decimals() {
        let invoker = Arc::new(ScriptedInvoker::new().respond("m1", "Quick answer."));
        let use_case = RunJobUseCase::new(invoker);

        let result = use_case
            .execute(RunJobInput::new("q", models(&["m1"])))
            .await
            .unwrap();

        for span in [
            result.timings.total,
            result.timings.fanout,
            result.timings.slowest,
            result.timings.merge,
        ] {
            assert!(
                ((span * 100.0).round() - span * 100.0).abs() < 1e-9,
                "span {span} not rounded to 2 decimals"
            );
        }
    }
}
