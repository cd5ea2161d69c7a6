//! HTTP service boundary for chorus
//!
//! The only layer that touches the outside world: it validates inbound job
//! requests, invokes the orchestrator, and serializes results and errors
//! into the wire shapes clients depend on.

pub mod dto;
pub mod routes;
pub mod server;

// Re-export commonly used types
pub use dto::{ErrorBody, RunJobRequest, RunJobResponse};
pub use server::{AppState, router, run};
