//! Infrastructure layer for chorus
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod invokers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileJobConfig, FileRunnerConfig, FileServerConfig,
};
pub use invokers::{fallback::FallbackInvoker, http::HttpModelInvoker};
