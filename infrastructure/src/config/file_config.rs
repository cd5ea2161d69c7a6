//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use chorus_domain::Strategy;
use serde::{Deserialize, Serialize};

/// Raw server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Address the HTTP boundary binds to
    pub listen: String,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            // Localhost only unless explicitly configured otherwise
            listen: "127.0.0.1:7410".to_string(),
        }
    }
}

/// Raw model-runner configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRunnerConfig {
    /// Primary runner endpoint
    pub endpoint: String,
    /// Secondary endpoints, tried in order when the primary fails
    pub fallback_endpoints: Vec<String>,
    /// Per-request timeout in seconds; unset means no timeout
    pub timeout_seconds: Option<u64>,
}

impl Default for FileRunnerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8787/run".to_string(),
            fallback_endpoints: Vec::new(),
            timeout_seconds: None,
        }
    }
}

/// Raw job configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJobConfig {
    /// Strategy applied when a request does not name one
    pub default_strategy: Strategy,
}

/// Complete raw configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP boundary settings
    pub server: FileServerConfig,
    /// Model-runner settings
    pub runner: FileRunnerConfig,
    /// Job defaults
    pub job: FileJobConfig,
}
