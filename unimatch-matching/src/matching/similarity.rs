//! Cosine similarity over embeddings.

use std::sync::Arc;

use ndarray::{Array2, ArrayView1};

use crate::embedding::{Embedder, Embedding, EmbeddingError};

/// Cosine similarity of two vectors, in [-1, 1]. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "embeddings must share a dimension");

    let a = ArrayView1::from(a).mapv(f64::from);
    let b = ArrayView1::from(b).mapv(f64::from);

    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (a.dot(&b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Dense N x N cosine similarity matrix for one batch of embeddings.
///
/// Rows are L2-normalised and multiplied by their transpose. Zero vectors stay
/// zero, so they score 0 against everything, themselves included.
pub fn similarity_matrix(embeddings: &[Embedding]) -> Array2<f64> {
    let dim = embeddings.first().map_or(0, Vec::len);
    let mut normalized = Array2::<f64>::zeros((embeddings.len(), dim));

    for (mut row, embedding) in normalized.rows_mut().into_iter().zip(embeddings) {
        for (dst, &src) in row.iter_mut().zip(embedding) {
            *dst = f64::from(src);
        }
        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row /= norm;
        }
    }

    let mut similarity = normalized.dot(&normalized.t());
    similarity.mapv_inplace(|v| v.clamp(-1.0, 1.0));
    similarity
}

/// Rescales a raw cosine score to a percentage in [0, 100], rounded to 3
/// decimal places. Negative similarity reads as 0.
pub fn to_percent(raw: f64) -> f64 {
    (raw.clamp(0.0, 1.0) * 100_000.0).round() / 1000.0
}

/// Entry point to the embedding oracle for everything that scores text.
#[derive(Clone)]
pub struct SimilarityScorer {
    embedder: Arc<dyn Embedder>,
}

impl SimilarityScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn model(&self) -> &str {
        self.embedder.model()
    }

    /// Embeds every text in a single oracle call. Missing text is embedded as "".
    pub async fn embed_texts(&self, texts: &[Option<&str>]) -> Result<Vec<Embedding>, EmbeddingError> {
        let owned: Vec<String> = texts.iter().map(|t| t.unwrap_or("").to_string()).collect();
        self.embedder.embed_batch(&owned).await
    }

    /// Raw cosine similarity of two texts, in [-1, 1].
    pub async fn score(&self, a: Option<&str>, b: Option<&str>) -> Result<f64, EmbeddingError> {
        let embeddings = self.embed_texts(&[a, b]).await?;
        Ok(cosine_similarity(&embeddings[0], &embeddings[1]))
    }

    /// Similarity of two texts as a percentage in [0, 100].
    pub async fn score_percent(&self, a: Option<&str>, b: Option<&str>) -> Result<f64, EmbeddingError> {
        Ok(to_percent(self.score(a, b).await?))
    }
}
