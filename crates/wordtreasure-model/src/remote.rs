//! Inference sidecar HTTP clients
//!
//! The embedding and NLI models run in a separate inference process (they
//! are large Transformer checkpoints); these providers talk to its HTTP API.
//!
//! # Features
//!
//! - Async HTTP communication with the sidecar
//! - Configurable endpoint and timeout
//! - Retry logic with exponential backoff
//!
//! # Examples
//!
//! ```no_run
//! use wordtreasure_model::RemoteEmbeddingProvider;
//!
//! let provider = RemoteEmbeddingProvider::new("http://localhost:9090", 768);
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wordtreasure_domain::traits::{
    EmbeddingProvider, EntailmentProvider, NliJudgment, NliLabel, ProviderError,
};

/// Default inference sidecar endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9090";

/// Default timeout for inference requests (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct EntailRequest<'a> {
    premise: &'a str,
    hypothesis: &'a str,
}

#[derive(Deserialize)]
struct EntailResponse {
    label: String,
    score: f32,
}

/// Shared request plumbing for the two sidecar providers.
struct SidecarClient {
    endpoint: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl SidecarClient {
    fn new(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// POST a JSON body and deserialize a JSON response, retrying transient
    /// failures with exponential backoff (1s, 2s, 4s, ...).
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.endpoint, path);

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return response.json::<R>().await.map_err(|e| {
                            ProviderError::InvalidResponse(format!(
                                "Failed to parse response: {}",
                                e
                            ))
                        });
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(ProviderError::ModelNotAvailable(url));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(ProviderError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(ProviderError::Communication(format!(
                        "Request failed: {}",
                        e
                    )));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| ProviderError::Communication("Max retries exceeded".to_string())))
    }
}

/// Embedding provider backed by the inference sidecar's `/embed` route.
pub struct RemoteEmbeddingProvider {
    client: SidecarClient,
    dimension: usize,
}

impl RemoteEmbeddingProvider {
    /// Create a provider for the given endpoint and embedding dimension
    pub fn new(endpoint: impl Into<String>, dimension: usize) -> Self {
        Self {
            client: SidecarClient::new(endpoint),
            dimension,
        }
    }

    /// Create a provider against the default local endpoint
    pub fn default_endpoint(dimension: usize) -> Self {
        Self::new(DEFAULT_ENDPOINT, dimension)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.client.max_retries = max_retries;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let response: EmbedResponse = self
            .client
            .post_json("/embed", &EmbedRequest { text })
            .await?;

        if response.embedding.len() != self.dimension {
            return Err(ProviderError::InvalidResponse(format!(
                "Expected {}-dimensional embedding, got {}",
                self.dimension,
                response.embedding.len()
            )));
        }

        Ok(response.embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// NLI provider backed by the inference sidecar's `/entail` route.
pub struct RemoteEntailmentProvider {
    client: SidecarClient,
}

impl RemoteEntailmentProvider {
    /// Create a provider for the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: SidecarClient::new(endpoint),
        }
    }

    /// Create a provider against the default local endpoint
    pub fn default_endpoint() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.client.max_retries = max_retries;
        self
    }

    fn parse_label(label: &str) -> Result<NliLabel, ProviderError> {
        match label.to_ascii_lowercase().as_str() {
            "entailment" => Ok(NliLabel::Entailment),
            "neutral" => Ok(NliLabel::Neutral),
            "contradiction" => Ok(NliLabel::Contradiction),
            other => Err(ProviderError::InvalidResponse(format!(
                "Unknown NLI label: {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl EntailmentProvider for RemoteEntailmentProvider {
    async fn entail(&self, premise: &str, hypothesis: &str) -> Result<NliJudgment, ProviderError> {
        let response: EntailResponse = self
            .client
            .post_json("/entail", &EntailRequest { premise, hypothesis })
            .await?;

        if !(0.0..=1.0).contains(&response.score) {
            return Err(ProviderError::InvalidResponse(format!(
                "NLI score out of range: {}",
                response.score
            )));
        }

        Ok(NliJudgment::new(
            Self::parse_label(&response.label)?,
            response.score,
        ))
    }
}
