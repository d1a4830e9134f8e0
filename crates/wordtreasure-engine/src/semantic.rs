//! Semantic similarity via sentence embeddings

use tokio::try_join;
use wordtreasure_domain::traits::{EmbeddingProvider, ProviderError};

/// Cosine similarity between two embedding vectors, in [-1, 1].
///
/// Zero-magnitude vectors compare as orthogonal (0.0).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have same length");

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Semantic similarity between two texts, rescaled to [0, 1].
///
/// Both embeddings are requested concurrently; the provider's native
/// [-1, 1] cosine range maps linearly through `(cos + 1) / 2`.
pub async fn score(
    provider: &dyn EmbeddingProvider,
    a: &str,
    b: &str,
) -> Result<f32, ProviderError> {
    let (vec_a, vec_b) = try_join!(provider.embed(a), provider.embed(b))?;

    let cosine = cosine_similarity(&vec_a, &vec_b);
    Ok(((cosine + 1.0) / 2.0).clamp(0.0, 1.0))
}
