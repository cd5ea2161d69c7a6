//! Fallback chain invoker

use async_trait::async_trait;
use chorus_application::ports::model_invoker::{InvokeError, ModelInvoker};
use chorus_domain::ModelId;
use std::sync::Arc;
use tracing::warn;

/// Invoker that walks an ordered chain of backends
///
/// Each invocation tries the backends primary-first and returns the first
/// success. A failed backend is logged and the next one tried; when every
/// backend fails, the last error is returned.
pub struct FallbackInvoker {
    backends: Vec<Arc<dyn ModelInvoker>>,
}

impl FallbackInvoker {
    /// Create a chain from primary-first backends
    pub fn new(backends: Vec<Arc<dyn ModelInvoker>>) -> Self {
        Self { backends }
    }

    /// Number of backends in the chain
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Whether the chain has no backends at all
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[async_trait]
impl ModelInvoker for FallbackInvoker {
    async fn invoke(&self, model: &ModelId, prompt: &str) -> Result<String, InvokeError> {
        let mut last_error =
            InvokeError::ModelNotAvailable("no invoker backends configured".to_string());

        for (position, backend) in self.backends.iter().enumerate() {
            match backend.invoke(model, prompt).await {
                Ok(response) => return Ok(response),
                Err(error) => {
                    warn!(%model, position, error = %error, "Invoker backend failed, trying next");
                    last_error = error;
                }
            }
        }

        Err(last_error)
    }
}
