//! WordTreasure Model Provider Layer
//!
//! Implementations of the provider traits from `wordtreasure-domain`.
//!
//! # Providers
//!
//! - `MockEmbeddingProvider` / `MockEntailmentProvider`: deterministic mocks
//!   for testing, with call counting and error injection
//! - `RemoteEmbeddingProvider` / `RemoteEntailmentProvider`: HTTP clients for
//!   the inference sidecar that hosts the sentence-embedding and NLI models
//! - `NullCategoryProvider`: Phase 3 placeholder, always reports no match
//!
//! # Examples
//!
//! ```
//! use wordtreasure_model::MockEmbeddingProvider;
//! use wordtreasure_domain::traits::EmbeddingProvider;
//!
//! # tokio_test::block_on(async {
//! let provider = MockEmbeddingProvider::new(384);
//! let vector = provider.embed("배신").await.unwrap();
//! assert_eq!(vector.len(), 384);
//! # });
//! ```

#![warn(missing_docs)]

pub mod remote;

use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};
use wordtreasure_domain::traits::{
    CategoryProvider, EmbeddingProvider, EntailmentProvider, NliJudgment, NliLabel, ProviderError,
};

pub use remote::{RemoteEmbeddingProvider, RemoteEntailmentProvider};

/// Deterministic mock embedding provider.
///
/// Returns pre-configured vectors for registered texts and falls back to a
/// hash-based deterministic embedding for everything else. The fallback
/// vectors are unit-normalized so cosine similarity behaves sensibly.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    dimension: usize,
    vectors: Arc<Mutex<HashMap<String, Vec<f32>>>>,
    fail_on: Arc<Mutex<Option<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockEmbeddingProvider {
    /// Create a mock producing vectors of the given dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Arc::new(Mutex::new(HashMap::new())),
            fail_on: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Register a fixed vector for a specific text
    pub fn add_vector(&self, text: impl Into<String>, vector: Vec<f32>) {
        self.vectors.lock().unwrap().insert(text.into(), vector);
    }

    /// Make `embed` fail for a specific text
    pub fn fail_on(&self, text: impl Into<String>) {
        *self.fail_on.lock().unwrap() = Some(text.into());
    }

    /// How many times `embed` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Hash text with a seed to get a deterministic f32 value in [-1, 1]
    fn hash_with_seed(text: &str, seed: u64) -> f32 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        seed.hash(&mut hasher);
        let hash_value = hasher.finish();
        let normalized = (hash_value as f64 / u64::MAX as f64) * 2.0 - 1.0;
        normalized as f32
    }

    fn fallback_vector(&self, text: &str) -> Vec<f32> {
        let mut embedding: Vec<f32> = (0..self.dimension)
            .map(|i| Self::hash_with_seed(text, i as u64))
            .collect();

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        }
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(bad) = self.fail_on.lock().unwrap().as_deref() {
            if bad == text {
                return Err(ProviderError::Other("Mock embedding failure".to_string()));
            }
        }

        if let Some(vector) = self.vectors.lock().unwrap().get(text) {
            return Ok(vector.clone());
        }

        Ok(self.fallback_vector(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Deterministic mock entailment provider.
///
/// Responses are scripted by hypothesis substring: the first registered
/// needle found in the hypothesis wins, in registration order. Unscripted
/// hypotheses get the default judgment (neutral at 0.5).
#[derive(Debug, Clone)]
pub struct MockEntailmentProvider {
    responses: Arc<Mutex<Vec<(String, NliJudgment)>>>,
    default_judgment: NliJudgment,
    fail_on: Arc<Mutex<Option<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockEntailmentProvider {
    /// Create a mock with the standard neutral default
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_judgment: NliJudgment::new(NliLabel::Neutral, 0.5),
            fail_on: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a mock whose default judgment is `judgment`
    pub fn with_default(judgment: NliJudgment) -> Self {
        Self {
            default_judgment: judgment,
            ..Self::new()
        }
    }

    /// Script a judgment for any hypothesis containing `needle`
    pub fn respond_containing(&self, needle: impl Into<String>, judgment: NliJudgment) {
        self.responses.lock().unwrap().push((needle.into(), judgment));
    }

    /// Make `entail` fail for any hypothesis containing `needle`
    pub fn fail_containing(&self, needle: impl Into<String>) {
        *self.fail_on.lock().unwrap() = Some(needle.into());
    }

    /// How many times `entail` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockEntailmentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntailmentProvider for MockEntailmentProvider {
    async fn entail(&self, _premise: &str, hypothesis: &str) -> Result<NliJudgment, ProviderError> {
        *self.call_count.lock().unwrap() += 1;

        if let Some(bad) = self.fail_on.lock().unwrap().as_deref() {
            if hypothesis.contains(bad) {
                return Err(ProviderError::Other("Mock entailment failure".to_string()));
            }
        }

        let responses = self.responses.lock().unwrap();
        for (needle, judgment) in responses.iter() {
            if hypothesis.contains(needle.as_str()) {
                return Ok(*judgment);
            }
        }

        Ok(self.default_judgment)
    }
}

/// Category-membership placeholder until domain gating lands (Phase 3).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCategoryProvider;

#[async_trait]
impl CategoryProvider for NullCategoryProvider {
    async fn same_category(&self, _a: &str, _b: &str) -> bool {
        false
    }
}
