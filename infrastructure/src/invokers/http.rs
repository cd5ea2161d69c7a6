//! HTTP model-runner invoker
//!
//! Talks to a model-runner service over HTTP: one POST per invocation with
//! `{model, prompt}`, answered by `{result}` on success or
//! `{error: {type, message}}` on failure.

use async_trait::async_trait;
use chorus_application::ports::model_invoker::{InvokeError, ModelInvoker};
use chorus_domain::ModelId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    #[serde(default)]
    result: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunErrorBody {
    error: RunErrorDetail,
}

#[derive(Debug, Deserialize)]
struct RunErrorDetail {
    message: String,
}

/// Invoker backed by a model-runner HTTP service
pub struct HttpModelInvoker {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpModelInvoker {
    /// Create an invoker for the given runner endpoint
    /// (e.g. `http://127.0.0.1:8787/run`), without a request timeout.
    ///
    /// The orchestration core enforces no timeouts of its own; set one here
    /// with [`HttpModelInvoker::with_timeout`] when the runner can hang.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, InvokeError> {
        Self::with_timeout(endpoint, None)
    }

    /// Create an invoker that aborts requests after `timeout`
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, InvokeError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| InvokeError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The runner endpoint this invoker posts to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ModelInvoker for HttpModelInvoker {
    async fn invoke(&self, model: &ModelId, prompt: &str) -> Result<String, InvokeError> {
        debug!(%model, endpoint = %self.endpoint, "Dispatching model run");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&RunRequest {
                model: model.as_str(),
                prompt,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InvokeError::Timeout
                } else {
                    InvokeError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InvokeError::RequestFailed(
                extract_error_message(&body).unwrap_or_else(|| format!("runner returned {status}")),
            ));
        }

        let body: RunResponse = response
            .json()
            .await
            .map_err(|e| InvokeError::RequestFailed(e.to_string()))?;

        match body.result {
            Some(result) if !result.trim().is_empty() => Ok(result),
            // A parseable response with an empty payload is a failure,
            // never an empty success
            _ => Err(InvokeError::EmptyResponse),
        }
    }
}

/// Pull the human-readable message out of a runner error body, if the body
/// follows the `{error: {type, message}}` shape.
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<RunErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}
