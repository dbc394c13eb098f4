//! Text embedding oracle.
//!
//! The matcher only needs `text -> vector`; which model produces the vectors is
//! a deployment concern. [`HttpEmbedder`] talks to any OpenAI-compatible
//! `/embeddings` endpoint (text-embeddings-inference, infinity, vLLM, ...).

mod error;
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use error::EmbeddingError;
pub use http::HttpEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

use async_trait::async_trait;

/// Dense vector produced by the embedding model.
pub type Embedding = Vec<f32>;

/// Maps text to fixed-length vectors. Deterministic for a given model version.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds every text in one call, returning vectors in input order.
    /// All vectors share one dimension.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;

    /// Model identifier, for logs and health output.
    fn model(&self) -> &str;
}

/// Checks the oracle's answer before anything indexes into it.
pub(crate) fn validate_batch(
    expected: usize,
    embeddings: &[Embedding],
) -> Result<(), EmbeddingError> {
    if embeddings.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: embeddings.len(),
        });
    }

    if let Some(first) = embeddings.first() {
        let dim = first.len();
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dim) {
            return Err(EmbeddingError::InvalidDimension {
                expected: dim,
                actual: bad.len(),
            });
        }
    }

    Ok(())
}
