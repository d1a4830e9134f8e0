//! The closed set of relation patterns between a guess and the answer
//!
//! The battery is a fixed, closed set so that hint generation keeps
//! exhaustiveness checking. Declaration order is significant: when two
//! patterns tie on entailment probability, the earlier variant wins.

/// How the guessed word relates to the answer word.
///
/// Each variant carries a default NLI probe template (embedding both
/// `{input}` and `{answer}`) and a default hint template (a single `{input}`
/// placeholder, filled verbatim).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationPattern {
    /// 상황발생 — the answer arises in the situation named by the guess
    SituationOccurrence,
    /// 감정원인 — the guess causes the emotion/behavior named by the answer
    EmotionCause,
    /// 속성관계 — the answer carries an attribute of the guess
    AttributeRelation,
    /// 사람관계 — the answer appears between people in the guessed relation
    HumanRelation,
    /// 유사장르 — the answer is the same kind of thing as the guess
    SimilarGenre,
    /// 반대관계 — the answer is the opposite of the guess
    Opposite,
    /// 장소관계 — the answer happens at the guessed place
    PlaceRelation,
    /// 시간관계 — the answer happens at the guessed time
    TimeRelation,
    /// 부분전체 — the answer is a part of the guess
    PartWhole,
    /// 결과관계 — the answer results from the guess
    OutcomeRelation,
}

impl RelationPattern {
    /// All patterns, in declaration order (the tie-break order).
    pub const ALL: [RelationPattern; 10] = [
        RelationPattern::SituationOccurrence,
        RelationPattern::EmotionCause,
        RelationPattern::AttributeRelation,
        RelationPattern::HumanRelation,
        RelationPattern::SimilarGenre,
        RelationPattern::Opposite,
        RelationPattern::PlaceRelation,
        RelationPattern::TimeRelation,
        RelationPattern::PartWhole,
        RelationPattern::OutcomeRelation,
    ];

    /// The Korean label used in configuration files and logs.
    pub fn label(&self) -> &'static str {
        match self {
            RelationPattern::SituationOccurrence => "상황발생",
            RelationPattern::EmotionCause => "감정원인",
            RelationPattern::AttributeRelation => "속성관계",
            RelationPattern::HumanRelation => "사람관계",
            RelationPattern::SimilarGenre => "유사장르",
            RelationPattern::Opposite => "반대관계",
            RelationPattern::PlaceRelation => "장소관계",
            RelationPattern::TimeRelation => "시간관계",
            RelationPattern::PartWhole => "부분전체",
            RelationPattern::OutcomeRelation => "결과관계",
        }
    }

    /// Parse a Korean label back into a pattern.
    pub fn parse(label: &str) -> Option<RelationPattern> {
        RelationPattern::ALL
            .iter()
            .copied()
            .find(|p| p.label() == label)
    }

    /// Default NLI probe sentence frame for this pattern.
    ///
    /// Contains both `{input}` and `{answer}` placeholders.
    pub fn probe_template(&self) -> &'static str {
        match self {
            RelationPattern::SituationOccurrence => "{answer}는 {input} 상황에서 발생할 수 있다.",
            RelationPattern::EmotionCause => "{input}는 {answer}의 원인이 될 수 있다.",
            RelationPattern::AttributeRelation => "{answer}는 {input}의 특성을 가지고 있다.",
            RelationPattern::HumanRelation => "{answer}는 {input} 사이에서 나타나는 것이다.",
            RelationPattern::SimilarGenre => "{answer}는 {input}와 비슷한 종류다.",
            RelationPattern::Opposite => "{answer}는 {input}과 반대되는 것이다.",
            RelationPattern::PlaceRelation => "{answer}는 {input}에서 일어나는 일이다.",
            RelationPattern::TimeRelation => "{answer}는 {input} 때 일어나는 것이다.",
            RelationPattern::PartWhole => "{answer}는 {input}의 일부분이다.",
            RelationPattern::OutcomeRelation => "{answer}는 {input}의 결과로 생기는 것이다.",
        }
    }

    /// Default hint sentence for this pattern.
    ///
    /// Contains a single `{input}` placeholder for the anchor word.
    pub fn hint_template(&self) -> &'static str {
        match self {
            RelationPattern::SituationOccurrence => "{input} 상황에서 나타나는 것이에요",
            RelationPattern::EmotionCause => "{input}에서 비롯되는 감정이나 행동이에요",
            RelationPattern::AttributeRelation => "{input}의 성질을 가진 것이에요",
            RelationPattern::HumanRelation => "{input} 사이에서 나타나는 것이에요",
            RelationPattern::SimilarGenre => "{input}와 비슷한 방식으로 진행되는 것이에요",
            RelationPattern::Opposite => "{input}과는 반대되는 개념이에요",
            RelationPattern::PlaceRelation => "{input}에서 경험할 수 있는 것이에요",
            RelationPattern::TimeRelation => "{input} 시기에 일어나는 것이에요",
            RelationPattern::PartWhole => "{input}의 한 부분이에요",
            RelationPattern::OutcomeRelation => "{input}의 결과로 나타나는 것이에요",
        }
    }
}

/// The classifier's decision for one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationVerdict {
    /// Best-supported relation pattern
    pub pattern: RelationPattern,
    /// Entailment probability of the winning probe, in [0, 1]
    pub confidence: f32,
    /// Antonym/opposition signal, in [0, 1]
    pub contradiction_score: f32,
}
