//! The per-request orchestration pipeline
//!
//! One `SimilarityEngine` is built at process start (configuration is
//! validated exactly once, fatally) and shared by every concurrent request;
//! it holds no per-request state. Within a request the three leaf signals
//! have no data dependency on each other and run as a fan-out joined before
//! aggregation. The only suspension points are the provider calls, so
//! dropping the returned future cancels any in-flight inference without
//! touching other requests.

use crate::aggregate::aggregate;
use crate::classifier::RelationClassifier;
use crate::config::{ConfigError, EngineConfig};
use crate::error::{EngineError, ValidationError};
use crate::hint::{HintGenerator, EXACT_MATCH_HINT};
use crate::{jamo, semantic};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use wordtreasure_domain::traits::{CategoryProvider, EmbeddingProvider, EntailmentProvider};
use wordtreasure_domain::{ScoreResult, SimilarityBreakdown, WordPair};

/// The similarity engine: validated configuration plus the model providers.
pub struct SimilarityEngine {
    config: EngineConfig,
    classifier: RelationClassifier,
    hints: HintGenerator,
    embedding: Arc<dyn EmbeddingProvider>,
    entailment: Arc<dyn EntailmentProvider>,
    category: Arc<dyn CategoryProvider>,
}

impl SimilarityEngine {
    /// Build an engine from configuration and providers.
    ///
    /// Validates every configuration invariant; a failure here must abort
    /// process startup.
    pub fn new(
        config: EngineConfig,
        embedding: Arc<dyn EmbeddingProvider>,
        entailment: Arc<dyn EntailmentProvider>,
        category: Arc<dyn CategoryProvider>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let classifier = RelationClassifier::new(&config)?;
        let hints = HintGenerator::new(&config)?;

        Ok(Self {
            config,
            classifier,
            hints,
            embedding,
            entailment,
            category,
        })
    }

    /// The validated configuration this engine runs with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score one guess against the answer.
    ///
    /// Validation happens before any provider call; a pair that normalizes
    /// to identical text short-circuits to a perfect score without touching
    /// the models.
    pub async fn process(&self, pair: &WordPair) -> Result<ScoreResult, EngineError> {
        let started = Instant::now();

        self.validate_input(pair)?;

        let normalized_input = normalize(&pair.input);
        let normalized_answer = normalize(&pair.answer);

        if normalized_input == normalized_answer {
            let processing_time_ms = elapsed_ms(started);
            info!(
                input = %pair.input,
                processing_time_ms,
                "exact match, model calls skipped"
            );
            return Ok(ScoreResult {
                score: 100.0,
                hint: EXACT_MATCH_HINT.to_string(),
                category_match: true,
                breakdown: SimilarityBreakdown::exact_match(),
                processing_time_ms,
            });
        }

        info!(input = %pair.input, answer = %pair.answer, "scoring request");

        // Jamo distance is pure CPU work on the normalized pair; the other
        // two signals suspend on their providers and run concurrently.
        let formative = jamo::score(&normalized_input, &normalized_answer);

        let (semantic, signals, category_match) = tokio::join!(
            semantic::score(self.embedding.as_ref(), &pair.input, &pair.answer),
            self.classifier
                .classify(self.entailment.as_ref(), &pair.input, &pair.answer),
            self.category.same_category(&pair.input, &pair.answer),
        );
        let semantic = semantic?;
        let signals = signals?;

        let breakdown = SimilarityBreakdown {
            semantic,
            relational: signals.relational,
            formative,
            contradiction: signals.verdict.contradiction_score,
        }
        .rounded();

        let score = round2(aggregate(&self.config.weights, &breakdown));
        let hint = self
            .hints
            .compose(score, &breakdown, &signals.verdict, &pair.input)?;

        let processing_time_ms = elapsed_ms(started);

        debug!(
            pattern = signals.verdict.pattern.label(),
            confidence = signals.verdict.confidence,
            "relation analysis"
        );
        info!(score, hint = %hint, processing_time_ms, "request scored");

        Ok(ScoreResult {
            score,
            hint,
            category_match,
            breakdown,
            processing_time_ms,
        })
    }

    /// Reject empty/whitespace-only or oversized words before any model
    /// call is made.
    fn validate_input(&self, pair: &WordPair) -> Result<(), ValidationError> {
        for (field, value) in [("user_input", &pair.input), ("answer", &pair.answer)] {
            if value.trim().is_empty() {
                return Err(ValidationError::Empty { field });
            }
            let len = value.chars().count();
            if len > self.config.max_word_length {
                return Err(ValidationError::TooLong {
                    field,
                    len,
                    max: self.config.max_word_length,
                });
            }
        }
        Ok(())
    }
}

/// Normalization applied before the exact-match check and the jamo signal:
/// lowercase, strip whitespace, drop punctuation.
fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn elapsed_ms(started: Instant) -> f32 {
    round2(started.elapsed().as_secs_f64() as f32 * 1000.0)
}
