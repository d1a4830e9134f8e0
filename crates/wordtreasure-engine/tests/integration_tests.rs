//! End-to-end pipeline tests against deterministic mock providers

use std::sync::Arc;
use wordtreasure_domain::traits::{NliJudgment, NliLabel};
use wordtreasure_domain::{RelationPattern, WordPair};
use wordtreasure_engine::{jamo, EngineConfig, EngineError, SimilarityEngine, ValidationError};
use wordtreasure_model::{MockEmbeddingProvider, MockEntailmentProvider, NullCategoryProvider};

fn entailment(score: f32) -> NliJudgment {
    NliJudgment::new(NliLabel::Entailment, score)
}

/// Providers behind an engine, kept around so tests can assert call counts.
struct TestHarness {
    engine: SimilarityEngine,
    embedding: MockEmbeddingProvider,
    entailment: MockEntailmentProvider,
}

fn harness() -> TestHarness {
    harness_with_config(EngineConfig::default())
}

fn harness_with_config(config: EngineConfig) -> TestHarness {
    let embedding = MockEmbeddingProvider::new(8);
    let entailment = MockEntailmentProvider::new();

    let engine = SimilarityEngine::new(
        config,
        Arc::new(embedding.clone()),
        Arc::new(entailment.clone()),
        Arc::new(NullCategoryProvider),
    )
    .unwrap();

    TestHarness {
        engine,
        embedding,
        entailment,
    }
}

/// A unit vector whose cosine against [1, 0, 0, ...] is exactly `cosine`.
fn vector_with_cosine(cosine: f32) -> Vec<f32> {
    let mut v = vec![0.0f32; 8];
    v[0] = cosine;
    v[1] = (1.0 - cosine * cosine).sqrt();
    v
}

fn axis_vector() -> Vec<f32> {
    let mut v = vec![0.0f32; 8];
    v[0] = 1.0;
    v
}

#[tokio::test]
async fn test_identity_short_circuits_to_100() {
    let h = harness();

    let result = h.engine.process(&WordPair::new("배신", "배신")).await.unwrap();

    assert_eq!(result.score, 100.0);
    assert_eq!(result.hint, "정답과 완전히 동일한 단어예요!");
    assert!(result.category_match);
    assert_eq!(result.breakdown.semantic, 1.0);
    assert_eq!(result.breakdown.relational, 1.0);
    assert_eq!(result.breakdown.formative, 1.0);
    assert_eq!(result.breakdown.contradiction, 0.0);

    // The short circuit must not touch the models.
    assert_eq!(h.embedding.call_count(), 0);
    assert_eq!(h.entailment.call_count(), 0);
}

#[tokio::test]
async fn test_identity_modulo_normalization() {
    let h = harness();

    // Case, whitespace and punctuation differences still count as exact.
    let result = h
        .engine
        .process(&WordPair::new("라이어 게임!", "라이어게임"))
        .await
        .unwrap();

    assert_eq!(result.score, 100.0);
    assert_eq!(h.embedding.call_count(), 0);
    assert_eq!(h.entailment.call_count(), 0);
}

#[tokio::test]
async fn test_empty_input_is_rejected_before_provider_calls() {
    let h = harness();

    let result = h.engine.process(&WordPair::new("", "배신")).await;
    match result {
        Err(EngineError::Validation(ValidationError::Empty { field })) => {
            assert_eq!(field, "user_input");
        }
        other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
    }

    let result = h.engine.process(&WordPair::new("친구", "   ")).await;
    assert!(matches!(
        result,
        Err(EngineError::Validation(ValidationError::Empty { field: "answer" }))
    ));

    assert_eq!(h.embedding.call_count(), 0);
    assert_eq!(h.entailment.call_count(), 0);
}

#[tokio::test]
async fn test_oversized_input_is_rejected() {
    let h = harness();

    let long_word = "가".repeat(101);
    let result = h.engine.process(&WordPair::new(long_word, "배신")).await;

    assert!(matches!(
        result,
        Err(EngineError::Validation(ValidationError::TooLong {
            field: "user_input",
            len: 101,
            max: 100,
        }))
    ));
    assert_eq!(h.entailment.call_count(), 0);
}

#[tokio::test]
async fn test_human_relation_scenario() {
    // 친구 → 배신: the documented 사람관계 example.
    let h = harness();

    h.embedding.add_vector("친구", axis_vector());
    h.embedding.add_vector("배신", vector_with_cosine(0.24)); // → semantic 0.62

    h.entailment
        .respond_containing("사이에서 나타나는 것이다", entailment(0.82));
    // Relational battery → mean 0.38
    h.entailment.respond_containing("관련이 있다", entailment(0.5));
    h.entailment.respond_containing("같은 맥락", entailment(0.5));
    h.entailment.respond_containing("상황에서 나타날", entailment(0.32));
    h.entailment.respond_containing("비슷한 의미", entailment(0.2));
    // Contradiction battery → max 0.05
    h.entailment.respond_containing("반대되는 의미다", entailment(0.05));
    h.entailment.respond_containing("서로 상반된다", entailment(0.03));

    let result = h.engine.process(&WordPair::new("친구", "배신")).await.unwrap();

    assert!((result.breakdown.semantic - 0.62).abs() < 1e-3);
    assert!((result.breakdown.relational - 0.38).abs() < 1e-4);
    assert!((result.breakdown.contradiction - 0.05).abs() < 1e-4);
    assert_eq!(result.hint, "친구 사이에서 나타나는 것이에요");
    assert!(!result.category_match);

    // Score follows the aggregation formula over the actual breakdown.
    let b = result.breakdown;
    let expected =
        (0.5 * b.semantic + 0.35 * b.relational + 0.15 * b.formative) * (1.0 - b.contradiction)
            * 100.0;
    assert!((result.score - expected).abs() < 0.01);
    assert!(result.processing_time_ms >= 0.0);
}

#[tokio::test]
async fn test_similar_genre_scenario() {
    // 마피아 → 라이어 게임: the documented 유사장르 example.
    let h = harness();

    h.embedding.add_vector("마피아", axis_vector());
    h.embedding.add_vector("라이어 게임", vector_with_cosine(0.44)); // → semantic 0.72

    h.entailment
        .respond_containing("마피아와 비슷한 종류다", entailment(0.81));
    h.entailment.respond_containing("관련이 있다", entailment(0.81));
    h.entailment.respond_containing("같은 맥락", entailment(0.81));
    h.entailment.respond_containing("상황에서 나타날", entailment(0.81));
    h.entailment.respond_containing("비슷한 의미", entailment(0.81));

    let result = h
        .engine
        .process(&WordPair::new("마피아", "라이어 게임"))
        .await
        .unwrap();

    assert!((result.breakdown.semantic - 0.72).abs() < 1e-3);
    assert!((result.breakdown.relational - 0.81).abs() < 1e-4);
    assert_eq!(result.breakdown.contradiction, 0.0);
    assert_eq!(result.hint, "마피아와 비슷한 방식으로 진행되는 것이에요");
}

#[tokio::test]
async fn test_full_contradiction_forces_zero_score() {
    let h = harness();

    h.embedding.add_vector("행복", axis_vector());
    h.embedding.add_vector("불행", axis_vector()); // cosine 1.0: maximal semantic overlap

    h.entailment.respond_containing("반대되는 의미다", entailment(1.0));
    h.entailment.respond_containing("관련이 있다", entailment(0.9));

    let result = h.engine.process(&WordPair::new("행복", "불행")).await.unwrap();

    assert_eq!(result.score, 0.0);
    assert_eq!(result.breakdown.contradiction, 1.0);
}

#[tokio::test]
async fn test_classification_is_deterministic_on_ties() {
    let h = harness();

    // Pin the semantic signal so only the classifier varies.
    h.embedding.add_vector("게임", axis_vector());
    h.embedding.add_vector("라이어 게임", vector_with_cosine(0.0));

    // 속성관계 and 부분전체 tie; 속성관계 is declared earlier.
    h.entailment
        .respond_containing("특성을 가지고 있다", entailment(0.66));
    h.entailment.respond_containing("일부분이다", entailment(0.66));

    let first = h.engine.process(&WordPair::new("게임", "라이어 게임")).await.unwrap();
    let second = h.engine.process(&WordPair::new("게임", "라이어 게임")).await.unwrap();

    assert_eq!(first.hint, second.hint);
    assert_eq!(first.breakdown.relational, second.breakdown.relational);
    // The winning pattern is visible through its hint template.
    assert_eq!(
        first.hint,
        RelationPattern::AttributeRelation
            .hint_template()
            .replace("{input}", "게임")
    );
}

#[tokio::test]
async fn test_embedding_failure_surfaces_as_provider_error() {
    let h = harness();
    h.embedding.fail_on("고장");

    let result = h.engine.process(&WordPair::new("고장", "배신")).await;
    assert!(matches!(result, Err(EngineError::Provider(_))));
}

#[tokio::test]
async fn test_entailment_failure_surfaces_as_provider_error() {
    let h = harness();
    h.entailment.fail_containing("관련이 있다");

    let result = h.engine.process(&WordPair::new("친구", "배신")).await;
    assert!(matches!(result, Err(EngineError::Provider(_))));
}

#[tokio::test]
async fn test_formative_signal_flows_from_jamo_distance() {
    let h = harness();

    // Both embeddings identical so the semantic signal is fixed at 1.0.
    h.embedding.add_vector("사과", axis_vector());
    h.embedding.add_vector("사괴", axis_vector());

    let result = h.engine.process(&WordPair::new("사과", "사괴")).await.unwrap();

    assert!((result.breakdown.formative - jamo::score("사과", "사괴")).abs() < 1e-4);
    assert!((result.breakdown.formative - 0.75).abs() < 1e-4);
}

#[tokio::test]
async fn test_low_confidence_gets_threshold_fallback_hint() {
    let h = harness();

    h.embedding.add_vector("사전", axis_vector());
    h.embedding.add_vector("냄비", vector_with_cosine(-0.4)); // semantic 0.3

    // Default judgments only: no entailment anywhere, confidence 0.
    let result = h.engine.process(&WordPair::new("사전", "냄비")).await.unwrap();

    let fallback_hints = [
        "거의 정답이에요! 더 정확한 표현이 있어요.",
        "아주 가까워요! 조금만 더 생각해보세요.",
        "비슷한 방향이에요. 더 구체적으로 표현해보세요.",
        "관련이 있지만 정확하지 않아요.",
        "방향이 조금 다른 것 같아요.",
        "전혀 다른 방향이에요. 다시 생각해보세요.",
    ];
    assert!(
        fallback_hints.iter().any(|base| result.hint.starts_with(base)),
        "expected a threshold fallback hint, got '{}'",
        result.hint
    );
}

#[tokio::test]
async fn test_invalid_weights_abort_engine_construction() {
    let mut config = EngineConfig::default();
    config.weights.relational = 0.9;

    let result = SimilarityEngine::new(
        config,
        Arc::new(MockEmbeddingProvider::new(8)),
        Arc::new(MockEntailmentProvider::new()),
        Arc::new(NullCategoryProvider),
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_shorter_length_bound_applies() {
    let mut config = EngineConfig::default();
    config.max_word_length = 4;
    let h = harness_with_config(config);

    let result = h.engine.process(&WordPair::new("다섯글자단어", "배신")).await;
    assert!(matches!(
        result,
        Err(EngineError::Validation(ValidationError::TooLong { .. }))
    ));
}
