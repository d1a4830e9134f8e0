//! Combining the signal breakdown into one score

use crate::config::Weights;
use wordtreasure_domain::SimilarityBreakdown;

/// Combine the breakdown into a final score in [0, 100].
///
/// The three positive signals are weighted and summed, then the
/// contradiction signal dampens the result multiplicatively: a fully
/// contradictory pair trends toward 0 no matter how much superficial
/// semantic or formative overlap it has.
pub fn aggregate(weights: &Weights, breakdown: &SimilarityBreakdown) -> f32 {
    let raw = weights.semantic * breakdown.semantic
        + weights.relational * breakdown.relational
        + weights.formative * breakdown.formative;

    let adjusted = raw * (1.0 - breakdown.contradiction);

    (adjusted * 100.0).clamp(0.0, 100.0)
}
