//! Model Invoker port
//!
//! Defines the interface for issuing one prompt to one named model.

use async_trait::async_trait;
use chorus_domain::ModelId;
use thiserror::Error;

/// Errors that can occur during model invocation
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Invoker for a single model call
///
/// This port defines how the application layer reaches a model. An
/// implementation may call a local inference binding, a remote HTTP service,
/// or a routing layer that itself falls back between multiple backends;
/// the orchestrator is agnostic to which.
///
/// A transport-level success that carries an empty or missing payload must
/// surface as [`InvokeError::EmptyResponse`], never as an empty success:
/// callers never merge on silently empty strings.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Issue one prompt to one named model and return its raw text response
    async fn invoke(&self, model: &ModelId, prompt: &str) -> Result<String, InvokeError>;
}
