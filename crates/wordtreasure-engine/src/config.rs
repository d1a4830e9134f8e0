//! Configuration for the similarity engine
//!
//! Loaded once at process start and read-only afterwards; every concurrent
//! request shares the same validated configuration. Violations are fatal at
//! startup, never per-request.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use wordtreasure_domain::RelationPattern;

/// Floating tolerance for the weight-sum invariant
const WEIGHT_SUM_TOLERANCE: f32 = 1e-6;

/// Configuration errors; all of them abort startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Weights must sum to 1.0
    #[error("Similarity weights must sum to 1.0 (got {sum})")]
    InvalidWeights {
        /// The actual sum
        sum: f32,
    },

    /// Exactly ten relation patterns are required
    #[error("Expected exactly 10 relation pattern templates, got {0}")]
    PatternCount(usize),

    /// Pattern label not in the closed set
    #[error("Unknown relation pattern: {0}")]
    UnknownPattern(String),

    /// The same pattern configured twice
    #[error("Duplicate relation pattern: {0}")]
    DuplicatePattern(String),

    /// A template is missing a required placeholder
    #[error("Template for {context} is missing the {placeholder} placeholder")]
    MalformedTemplate {
        /// Which template is broken
        context: String,
        /// The placeholder that was expected
        placeholder: &'static str,
    },

    /// Any other out-of-range value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Weight triple for combining the three positive signals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weights {
    /// Weight of the embedding similarity signal
    pub semantic: f32,
    /// Weight of the NLI relational signal
    pub relational: f32,
    /// Weight of the jamo formative signal
    pub formative: f32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            semantic: 0.50,
            relational: 0.35,
            formative: 0.15,
        }
    }
}

/// One (probe, hint) template pair for a relation pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternTemplates {
    /// Korean pattern label (must parse into `RelationPattern`)
    pub pattern: String,
    /// NLI probe frame with `{input}` and `{answer}` placeholders
    pub probe: String,
    /// Hint sentence with a single `{input}` placeholder
    pub hint: String,
}

/// One score-threshold fallback hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreThreshold {
    /// Minimum score (inclusive) for this hint to apply
    pub min_score: f32,
    /// The fallback hint text
    pub hint: String,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum accepted word length (characters)
    #[serde(default = "default_max_word_length")]
    pub max_word_length: usize,

    /// Below this classifier confidence the contextual hint is skipped
    #[serde(default = "default_min_pattern_confidence")]
    pub min_pattern_confidence: f32,

    /// Below this score the contextual hint is skipped
    #[serde(default = "default_min_contextual_score")]
    pub min_contextual_score: f32,

    /// Probe frames for the averaged relational-similarity battery
    #[serde(default = "default_relation_probes")]
    pub relation_probes: Vec<String>,

    /// Probe frames for the antonym/opposition battery
    #[serde(default = "default_contradiction_probes")]
    pub contradiction_probes: Vec<String>,

    /// Signal weights; must sum to 1.0
    #[serde(default)]
    pub weights: Weights,

    /// The ordered (probe, hint) pairs for the 10 relation patterns
    #[serde(default = "default_patterns")]
    pub patterns: Vec<PatternTemplates>,

    /// Score-bucketed fallback hints, highest threshold first
    #[serde(default = "default_score_thresholds")]
    pub score_thresholds: Vec<ScoreThreshold>,
}

fn default_max_word_length() -> usize {
    100
}

fn default_min_pattern_confidence() -> f32 {
    0.3
}

fn default_min_contextual_score() -> f32 {
    15.0
}

fn default_relation_probes() -> Vec<String> {
    vec![
        "{input}은 {answer}과 관련이 있다.".to_string(),
        "{input}는 {answer}와 같은 맥락에서 언급된다.".to_string(),
        "{input}는 {answer}의 상황에서 나타날 수 있다.".to_string(),
        "{input}와 {answer}는 비슷한 의미를 가진다.".to_string(),
    ]
}

fn default_contradiction_probes() -> Vec<String> {
    vec![
        "{input}은 {answer}과 반대되는 의미다.".to_string(),
        "{input}와 {answer}는 서로 상반된다.".to_string(),
    ]
}

fn default_patterns() -> Vec<PatternTemplates> {
    RelationPattern::ALL
        .iter()
        .map(|p| PatternTemplates {
            pattern: p.label().to_string(),
            probe: p.probe_template().to_string(),
            hint: p.hint_template().to_string(),
        })
        .collect()
}

fn default_score_thresholds() -> Vec<ScoreThreshold> {
    let buckets = [
        (95.0, "거의 정답이에요! 더 정확한 표현이 있어요."),
        (80.0, "아주 가까워요! 조금만 더 생각해보세요."),
        (60.0, "비슷한 방향이에요. 더 구체적으로 표현해보세요."),
        (40.0, "관련이 있지만 정확하지 않아요."),
        (20.0, "방향이 조금 다른 것 같아요."),
        (0.0, "전혀 다른 방향이에요. 다시 생각해보세요."),
    ];
    buckets
        .iter()
        .map(|(min_score, hint)| ScoreThreshold {
            min_score: *min_score,
            hint: hint.to_string(),
        })
        .collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_word_length: default_max_word_length(),
            min_pattern_confidence: default_min_pattern_confidence(),
            min_contextual_score: default_min_contextual_score(),
            relation_probes: default_relation_probes(),
            contradiction_probes: default_contradiction_probes(),
            weights: Weights::default(),
            patterns: default_patterns(),
            score_thresholds: default_score_thresholds(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(toml_str)?;
        Ok(config)
    }

    /// Validate every startup invariant.
    ///
    /// The engine constructor runs this once; a failure here means the
    /// process must not start serving.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sum = self.weights.semantic + self.weights.relational + self.weights.formative;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights { sum });
        }
        for (name, w) in [
            ("semantic", self.weights.semantic),
            ("relational", self.weights.relational),
            ("formative", self.weights.formative),
        ] {
            if !(0.0..=1.0).contains(&w) {
                return Err(ConfigError::InvalidValue(format!(
                    "{} weight {} is outside [0, 1]",
                    name, w
                )));
            }
        }

        if self.max_word_length == 0 {
            return Err(ConfigError::InvalidValue(
                "max_word_length must be greater than 0".to_string(),
            ));
        }

        if self.relation_probes.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one relational probe is required".to_string(),
            ));
        }
        for probe in &self.relation_probes {
            Self::require_placeholders("relational probe", probe, true)?;
        }
        if self.contradiction_probes.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one contradiction probe is required".to_string(),
            ));
        }
        for probe in &self.contradiction_probes {
            Self::require_placeholders("contradiction probe", probe, true)?;
        }

        if self.patterns.len() != RelationPattern::ALL.len() {
            return Err(ConfigError::PatternCount(self.patterns.len()));
        }
        let mut seen: Vec<RelationPattern> = Vec::with_capacity(self.patterns.len());
        for entry in &self.patterns {
            let pattern = RelationPattern::parse(&entry.pattern)
                .ok_or_else(|| ConfigError::UnknownPattern(entry.pattern.clone()))?;
            if seen.contains(&pattern) {
                return Err(ConfigError::DuplicatePattern(entry.pattern.clone()));
            }
            seen.push(pattern);

            Self::require_placeholders(&format!("{} probe", entry.pattern), &entry.probe, true)?;
            Self::require_placeholders(&format!("{} hint", entry.pattern), &entry.hint, false)?;
        }

        if !(0.0..=1.0).contains(&self.min_pattern_confidence) {
            return Err(ConfigError::InvalidValue(format!(
                "min_pattern_confidence {} is outside [0, 1]",
                self.min_pattern_confidence
            )));
        }

        if self.score_thresholds.is_empty() {
            return Err(ConfigError::InvalidValue(
                "at least one score threshold hint is required".to_string(),
            ));
        }
        if !self.score_thresholds.iter().any(|t| t.min_score <= 0.0) {
            return Err(ConfigError::InvalidValue(
                "score thresholds must include a catch-all at 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The pattern templates resolved against the closed enum, in
    /// configuration order. Call only after `validate()` has passed.
    pub fn resolved_patterns(&self) -> Vec<(RelationPattern, &str, &str)> {
        self.patterns
            .iter()
            .filter_map(|entry| {
                RelationPattern::parse(&entry.pattern)
                    .map(|p| (p, entry.probe.as_str(), entry.hint.as_str()))
            })
            .collect()
    }

    fn require_placeholders(
        context: &str,
        template: &str,
        needs_answer: bool,
    ) -> Result<(), ConfigError> {
        if !template.contains("{input}") {
            return Err(ConfigError::MalformedTemplate {
                context: context.to_string(),
                placeholder: "{input}",
            });
        }
        if needs_answer && !template.contains("{answer}") {
            return Err(ConfigError::MalformedTemplate {
                context: context.to_string(),
                placeholder: "{answer}",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.patterns.len(), 10);
        assert_eq!(config.relation_probes.len(), 4);
        assert_eq!(config.contradiction_probes.len(), 2);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let mut config = EngineConfig::default();
        config.weights.semantic = 0.9;
        match config.validate() {
            Err(ConfigError::InvalidWeights { sum }) => assert!((sum - 1.4).abs() < 1e-5),
            other => panic!("Expected InvalidWeights, got {:?}", other),
        }
    }

    #[test]
    fn test_weight_sum_tolerance() {
        let mut config = EngineConfig::default();
        // Within floating tolerance of 1.0
        config.weights = Weights {
            semantic: 0.5,
            relational: 0.35,
            formative: 0.15,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pattern_count_enforced() {
        let mut config = EngineConfig::default();
        config.patterns.pop();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PatternCount(9))
        ));
    }

    #[test]
    fn test_unknown_pattern_rejected() {
        let mut config = EngineConfig::default();
        config.patterns[0].pattern = "없는관계".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownPattern(_))
        ));
    }

    #[test]
    fn test_duplicate_pattern_rejected() {
        let mut config = EngineConfig::default();
        config.patterns[1].pattern = config.patterns[0].pattern.clone();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicatePattern(_))
        ));
    }

    #[test]
    fn test_malformed_probe_placeholder() {
        let mut config = EngineConfig::default();
        config.patterns[0].probe = "자리표시자가 없다".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_malformed_hint_placeholder() {
        let mut config = EngineConfig::default();
        config.patterns[3].hint = "고정 문장".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_zero_max_word_length_rejected() {
        let mut config = EngineConfig::default();
        config.max_word_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolved_patterns_cover_all_variants() {
        let config = EngineConfig::default();
        let resolved = config.resolved_patterns();
        assert_eq!(resolved.len(), 10);
        for pattern in RelationPattern::ALL {
            assert!(resolved.iter().any(|(p, _, _)| *p == pattern));
        }
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml = r#"
            max_word_length = 50

            [weights]
            semantic = 0.4
            relational = 0.4
            formative = 0.2
        "#;

        let config = EngineConfig::from_toml(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_word_length, 50);
        assert_eq!(config.weights.semantic, 0.4);
        assert_eq!(config.patterns.len(), 10);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed = EngineConfig::from_toml(&toml_str).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.patterns.len(), config.patterns.len());
        assert_eq!(parsed.max_word_length, config.max_word_length);
    }
}
