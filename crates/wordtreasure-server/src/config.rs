//! Configuration file parsing for the similarity server.
//!
//! Loads settings from TOML files: bind address, the inference sidecar
//! endpoint, and the nested engine configuration.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use wordtreasure_engine::EngineConfig;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ServerConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Inference sidecar endpoint hosting the embedding and NLI models
    #[serde(default = "default_inference_endpoint")]
    pub inference_endpoint: String,

    /// Embedding dimension the sidecar model produces
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Latency target surfaced through /api/config (milliseconds)
    #[serde(default = "default_target_latency_ms")]
    pub target_latency_ms: u64,

    /// Engine configuration (weights, probes, templates)
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    8000
}

fn default_inference_endpoint() -> String {
    "http://localhost:9090".to_string()
}

fn default_embedding_dimension() -> usize {
    768
}

fn default_target_latency_ms() -> u64 {
    150
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            inference_endpoint: default_inference_endpoint(),
            embedding_dimension: default_embedding_dimension(),
            target_latency_ms: default_target_latency_ms(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServerConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8000,
            ..Self::default()
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
