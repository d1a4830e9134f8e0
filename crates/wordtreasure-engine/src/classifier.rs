//! Relation classification over the NLI probe battery
//!
//! One request fans out every probe concurrently: the 10 pattern probes, the
//! averaged relational battery, and the contradiction battery. The probes
//! are independent and share no mutable state, so completion order never
//! affects the result.

use crate::config::{ConfigError, EngineConfig};
use futures::future::try_join_all;
use tracing::debug;
use wordtreasure_domain::traits::{EntailmentProvider, NliJudgment, NliLabel, ProviderError};
use wordtreasure_domain::{RelationPattern, RelationVerdict};

/// Everything the classifier contributes to one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationSignals {
    /// The winning pattern with confidence and contradiction score
    pub verdict: RelationVerdict,
    /// The averaged relational-similarity signal, in [0, 1]
    pub relational: f32,
}

/// Runs the fixed NLI probe battery for one word pair.
pub struct RelationClassifier {
    /// Pattern probes in declaration order; the fold relies on this order
    /// for the first-declared-wins tie break.
    pattern_probes: Vec<(RelationPattern, String)>,
    relation_probes: Vec<String>,
    contradiction_probes: Vec<String>,
}

impl RelationClassifier {
    /// Build a classifier from validated configuration.
    ///
    /// Configuration order of the pattern entries does not matter here; the
    /// probes are re-sorted into enum declaration order so the tie-break
    /// stays a property of the closed set, not of the config file.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let resolved = config.resolved_patterns();

        let mut pattern_probes = Vec::with_capacity(RelationPattern::ALL.len());
        for pattern in RelationPattern::ALL {
            let (_, probe, _) = resolved
                .iter()
                .find(|(p, _, _)| *p == pattern)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(format!(
                        "no probe template for {}",
                        pattern.label()
                    ))
                })?;
            pattern_probes.push((pattern, probe.to_string()));
        }

        Ok(Self {
            pattern_probes,
            relation_probes: config.relation_probes.clone(),
            contradiction_probes: config.contradiction_probes.clone(),
        })
    }

    /// Render a probe frame with the actual word pair.
    fn render(template: &str, input: &str, answer: &str) -> String {
        template.replace("{input}", input).replace("{answer}", answer)
    }

    /// Classify the relation between `input` and `answer`.
    ///
    /// All probes are issued concurrently against the entailment provider.
    /// The answer word serves as the premise and each rendered probe as the
    /// hypothesis (zero-shot NLI framing).
    pub async fn classify(
        &self,
        provider: &dyn EntailmentProvider,
        input: &str,
        answer: &str,
    ) -> Result<RelationSignals, ProviderError> {
        let pattern_futures = self.pattern_probes.iter().map(|(_, template)| {
            let hypothesis = Self::render(template, input, answer);
            async move { provider.entail(answer, &hypothesis).await }
        });
        let relation_futures = self.relation_probes.iter().map(|template| {
            let hypothesis = Self::render(template, input, answer);
            async move { provider.entail(answer, &hypothesis).await }
        });
        let contradiction_futures = self.contradiction_probes.iter().map(|template| {
            let hypothesis = Self::render(template, input, answer);
            async move { provider.entail(answer, &hypothesis).await }
        });

        let (pattern_judgments, relation_judgments, contradiction_judgments) = tokio::try_join!(
            try_join_all(pattern_futures),
            try_join_all(relation_futures),
            try_join_all(contradiction_futures),
        )?;

        let (pattern, confidence) = self.best_pattern(&pattern_judgments);
        let relational = relational_score(&relation_judgments);
        let contradiction_score = contradiction_judgments
            .iter()
            .map(NliJudgment::entailment_probability)
            .fold(0.0f32, f32::max);

        debug!(
            pattern = pattern.label(),
            confidence, relational, contradiction_score, "relation battery folded"
        );

        Ok(RelationSignals {
            verdict: RelationVerdict {
                pattern,
                confidence,
                contradiction_score,
            },
            relational,
        })
    }

    /// Maximum entailment probability wins; ties go to the pattern declared
    /// earliest (strict `>` over the declaration-ordered probes).
    fn best_pattern(&self, judgments: &[NliJudgment]) -> (RelationPattern, f32) {
        let mut best = (self.pattern_probes[0].0, 0.0f32);
        for ((pattern, _), judgment) in self.pattern_probes.iter().zip(judgments) {
            let probability = judgment.entailment_probability();
            if probability > best.1 {
                best = (*pattern, probability);
            }
        }
        best
    }
}

/// Mean over the relational battery: entailment contributes its probability,
/// neutral half of it, contradiction nothing.
fn relational_score(judgments: &[NliJudgment]) -> f32 {
    if judgments.is_empty() {
        return 0.0;
    }
    let total: f32 = judgments
        .iter()
        .map(|j| match j.label {
            NliLabel::Entailment => j.score,
            NliLabel::Neutral => j.score * 0.5,
            NliLabel::Contradiction => 0.0,
        })
        .sum();
    total / judgments.len() as f32
}
