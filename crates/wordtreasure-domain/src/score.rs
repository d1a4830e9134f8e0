//! The composed result returned for one scored request

use crate::breakdown::SimilarityBreakdown;

/// Everything the caller gets back for one guess.
///
/// Constructed once at the end of the pipeline and owned solely by the
/// caller after return; the engine retains no per-request state.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Final similarity score in [0, 100]
    pub score: f32,
    /// Natural-language hint describing the relationship
    pub hint: String,
    /// Whether guess and answer share a category (Phase 3 collaborator)
    pub category_match: bool,
    /// The per-signal breakdown behind the score
    pub breakdown: SimilarityBreakdown,
    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: f32,
}
