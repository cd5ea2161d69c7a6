//! Application layer for chorus
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer; concrete invoker adapters live in infrastructure.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::model_invoker::{InvokeError, ModelInvoker};
pub use use_cases::run_job::{
    JobResult, JobTimings, ModelInvocationResult, RunJobError, RunJobInput, RunJobUseCase,
};
