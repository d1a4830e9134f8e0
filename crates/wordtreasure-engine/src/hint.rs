//! Hint generation from the classified relation
//!
//! The contextual hint comes from the winning pattern's template with the
//! player's own word substituted in. When the classifier was not confident
//! enough (or the score is too low for a contextual hint to help), the
//! generator falls back to score-bucketed base hints, optionally decorated
//! with a detail suffix pointing at the dominant signal.

use crate::config::{ConfigError, EngineConfig, ScoreThreshold};
use crate::error::EngineError;
use wordtreasure_domain::{RelationPattern, RelationVerdict, SimilarityBreakdown};

/// Hint returned by the exact-match short circuit.
pub const EXACT_MATCH_HINT: &str = "정답과 완전히 동일한 단어예요!";

/// Suffix when the semantic signal dominates
const SEMANTIC_HIGH_SUFFIX: &str = "의미적으로 매우 가까워요";
/// Suffix when the relational signal dominates
const RELATIONAL_HIGH_SUFFIX: &str = "맥락이나 상황은 정확해요";
/// Suffix when the formative signal dominates (likely a typo)
const FORMATIVE_HIGH_SUFFIX: &str = "철자가 거의 비슷해요";
/// Suffix when the contradiction signal is high
const CONTRADICTION_SUFFIX: &str = "하지만 정반대 의미는 아니에요";

/// Score at or above which a detail suffix is appended to a contextual hint
const DETAIL_SUFFIX_MIN_SCORE: f32 = 60.0;

/// Renders hints for one request.
pub struct HintGenerator {
    /// Hint templates in declaration order
    templates: Vec<(RelationPattern, String)>,
    /// Fallback hints, sorted by descending threshold
    thresholds: Vec<ScoreThreshold>,
    min_pattern_confidence: f32,
    min_contextual_score: f32,
}

impl HintGenerator {
    /// Build a generator from validated configuration.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        let resolved = config.resolved_patterns();

        let mut templates = Vec::with_capacity(RelationPattern::ALL.len());
        for pattern in RelationPattern::ALL {
            let (_, _, hint) = resolved
                .iter()
                .find(|(p, _, _)| *p == pattern)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(format!(
                        "no hint template for {}",
                        pattern.label()
                    ))
                })?;
            templates.push((pattern, hint.to_string()));
        }

        let mut thresholds = config.score_thresholds.clone();
        thresholds.sort_by(|a, b| b.min_score.total_cmp(&a.min_score));

        Ok(Self {
            templates,
            thresholds,
            min_pattern_confidence: config.min_pattern_confidence,
            min_contextual_score: config.min_contextual_score,
        })
    }

    /// Fill the winning pattern's hint template with the anchor word.
    ///
    /// The placeholder is substituted verbatim; no grammatical inflection.
    /// A missing template for a known pattern is a programming defect, not
    /// a recoverable condition.
    pub fn render(&self, verdict: &RelationVerdict, input: &str) -> Result<String, EngineError> {
        let template = self
            .templates
            .iter()
            .find(|(p, _)| *p == verdict.pattern)
            .map(|(_, t)| t.as_str())
            .ok_or_else(|| {
                EngineError::Internal(format!(
                    "No hint template for pattern {}",
                    verdict.pattern.label()
                ))
            })?;

        Ok(template.replace("{input}", input))
    }

    /// Compose the hint for one scored request.
    pub fn compose(
        &self,
        score: f32,
        breakdown: &SimilarityBreakdown,
        verdict: &RelationVerdict,
        input: &str,
    ) -> Result<String, EngineError> {
        let detail = self.detail_hint(breakdown, score);

        let use_contextual = verdict.confidence >= self.min_pattern_confidence
            && score >= self.min_contextual_score;

        if use_contextual {
            let contextual = self.render(verdict, input)?;
            return Ok(match detail {
                Some(suffix) if score >= DETAIL_SUFFIX_MIN_SCORE => {
                    format!("{}. {}", contextual, suffix)
                }
                _ => contextual,
            });
        }

        let base = self.base_hint(score);
        Ok(match detail {
            Some(suffix) => format!("{} {}", base, suffix),
            None => base.to_string(),
        })
    }

    /// The score-bucketed fallback hint.
    fn base_hint(&self, score: f32) -> &str {
        self.thresholds
            .iter()
            .find(|t| score >= t.min_score)
            .or_else(|| self.thresholds.last())
            .map(|t| t.hint.as_str())
            .unwrap_or_default()
    }

    /// A suffix pointing at whichever signal dominates, if any does.
    fn detail_hint(&self, breakdown: &SimilarityBreakdown, score: f32) -> Option<&'static str> {
        if breakdown.contradiction > 0.6 {
            return Some(CONTRADICTION_SUFFIX);
        }
        if score < 20.0 {
            return None;
        }

        let semantic = breakdown.semantic;
        let relational = breakdown.relational;
        let formative = breakdown.formative;

        if semantic >= relational && semantic >= formative {
            if semantic > 0.6 && relational < 0.3 {
                return Some(SEMANTIC_HIGH_SUFFIX);
            }
        } else if relational >= semantic && relational >= formative {
            if relational > 0.6 && semantic < 0.3 {
                return Some(RELATIONAL_HIGH_SUFFIX);
            }
        } else if formative > 0.7 {
            return Some(FORMATIVE_HIGH_SUFFIX);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> HintGenerator {
        HintGenerator::new(&EngineConfig::default()).unwrap()
    }

    fn verdict(pattern: RelationPattern, confidence: f32) -> RelationVerdict {
        RelationVerdict {
            pattern,
            confidence,
            contradiction_score: 0.0,
        }
    }

    fn quiet_breakdown() -> SimilarityBreakdown {
        SimilarityBreakdown {
            semantic: 0.4,
            relational: 0.4,
            formative: 0.2,
            contradiction: 0.0,
        }
    }

    #[test]
    fn test_render_substitutes_anchor_verbatim() {
        let g = generator();
        let hint = g
            .render(&verdict(RelationPattern::HumanRelation, 0.82), "친구")
            .unwrap();
        assert_eq!(hint, "친구 사이에서 나타나는 것이에요");

        let hint = g
            .render(&verdict(RelationPattern::SimilarGenre, 0.81), "마피아")
            .unwrap();
        assert_eq!(hint, "마피아와 비슷한 방식으로 진행되는 것이에요");
    }

    #[test]
    fn test_render_covers_every_pattern() {
        let g = generator();
        for pattern in RelationPattern::ALL {
            let hint = g.render(&verdict(pattern, 0.9), "단어").unwrap();
            assert!(hint.contains("단어"), "{} hint missing anchor", pattern.label());
            assert!(!hint.contains("{input}"));
        }
    }

    #[test]
    fn test_compose_prefers_contextual_hint() {
        let g = generator();
        let hint = g
            .compose(
                45.0,
                &quiet_breakdown(),
                &verdict(RelationPattern::HumanRelation, 0.82),
                "친구",
            )
            .unwrap();
        assert_eq!(hint, "친구 사이에서 나타나는 것이에요");
    }

    #[test]
    fn test_compose_falls_back_when_confidence_low() {
        let g = generator();
        let hint = g
            .compose(
                45.0,
                &quiet_breakdown(),
                &verdict(RelationPattern::HumanRelation, 0.1),
                "친구",
            )
            .unwrap();
        // 40–60 bucket
        assert_eq!(hint, "관련이 있지만 정확하지 않아요.");
    }

    #[test]
    fn test_compose_falls_back_when_score_too_low() {
        let g = generator();
        let hint = g
            .compose(
                10.0,
                &SimilarityBreakdown {
                    semantic: 0.1,
                    relational: 0.05,
                    formative: 0.1,
                    contradiction: 0.0,
                },
                &verdict(RelationPattern::PlaceRelation, 0.9),
                "학교",
            )
            .unwrap();
        assert_eq!(hint, "전혀 다른 방향이에요. 다시 생각해보세요.");
    }

    #[test]
    fn test_contextual_hint_gains_suffix_at_high_score() {
        let g = generator();
        let breakdown = SimilarityBreakdown {
            semantic: 0.9,
            relational: 0.2,
            formative: 0.3,
            contradiction: 0.0,
        };
        let hint = g
            .compose(
                72.0,
                &breakdown,
                &verdict(RelationPattern::SimilarGenre, 0.8),
                "마피아",
            )
            .unwrap();
        assert_eq!(
            hint,
            "마피아와 비슷한 방식으로 진행되는 것이에요. 의미적으로 매우 가까워요"
        );
    }

    #[test]
    fn test_contradiction_suffix_on_fallback() {
        let g = generator();
        let breakdown = SimilarityBreakdown {
            semantic: 0.5,
            relational: 0.2,
            formative: 0.2,
            contradiction: 0.8,
        };
        let hint = g
            .compose(
                25.0,
                &breakdown,
                &verdict(RelationPattern::Opposite, 0.2),
                "행복",
            )
            .unwrap();
        assert!(hint.ends_with(CONTRADICTION_SUFFIX));
    }

    #[test]
    fn test_formative_suffix_when_spelling_dominates() {
        let g = generator();
        let breakdown = SimilarityBreakdown {
            semantic: 0.3,
            relational: 0.2,
            formative: 0.9,
            contradiction: 0.0,
        };
        let hint = g
            .compose(
                50.0,
                &breakdown,
                &verdict(RelationPattern::AttributeRelation, 0.1),
                "사과",
            )
            .unwrap();
        assert!(hint.ends_with(FORMATIVE_HIGH_SUFFIX));
    }

    #[test]
    fn test_base_hint_buckets() {
        let g = generator();
        assert_eq!(g.base_hint(97.0), "거의 정답이에요! 더 정확한 표현이 있어요.");
        assert_eq!(g.base_hint(80.0), "아주 가까워요! 조금만 더 생각해보세요.");
        assert_eq!(g.base_hint(59.9), "관련이 있지만 정확하지 않아요.");
        assert_eq!(g.base_hint(0.0), "전혀 다른 방향이에요. 다시 생각해보세요.");
    }
}
