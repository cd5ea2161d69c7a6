//! Model Invoker adapters
//!
//! Implementations of the [`ModelInvoker`] port. The HTTP adapter talks to a
//! model-runner service; the fallback adapter chains several invokers so a
//! job survives one backend being down.
//!
//! [`ModelInvoker`]: chorus_application::ports::model_invoker::ModelInvoker

pub mod fallback;
pub mod http;

pub use fallback::FallbackInvoker;
pub use http::HttpModelInvoker;
