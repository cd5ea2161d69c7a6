//! Wire types for the job API
//!
//! Field names follow the JSON contract (`maxRetries`, `supportingModels`),
//! so existing clients keep working unchanged.

use chorus_application::{JobResult, JobTimings};
use chorus_domain::{MergedResult, Strategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /run`
///
/// `prompt` and `models` are required and validated by the handler;
/// everything else is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunJobRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub models: Option<Vec<String>>,
    /// Strategy override; the configured default applies when absent
    #[serde(default)]
    pub strategy: Option<Strategy>,
    /// Accepted for wire compatibility; currently inert
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Accepted for wire compatibility; no retries are performed
    #[serde(default)]
    pub max_retries: Option<u32>,
    /// Accepted for wire compatibility; currently inert
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// Success body of `POST /run`
#[derive(Debug, Serialize)]
pub struct RunJobResponse {
    /// The merged answer text
    pub result: String,
    /// Raw response per model
    pub responses: BTreeMap<String, String>,
    /// Structured merge outcome
    pub structured: MergedResult,
    /// Timing instrumentation
    pub timings: JobTimings,
}

impl From<JobResult> for RunJobResponse {
    fn from(job: JobResult) -> Self {
        let responses = job
            .invocations
            .iter()
            .map(|inv| (inv.model.to_string(), inv.response.clone()))
            .collect();

        Self {
            result: job.merged,
            responses,
            structured: job.structured,
            timings: job.timings,
        }
    }
}

/// Error envelope shared by every failure response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// The `{type, message}` payload inside [`ErrorBody`]
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl ErrorBody {
    pub fn new(kind: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                kind: kind.to_string(),
                message: message.into(),
            },
        }
    }
}
