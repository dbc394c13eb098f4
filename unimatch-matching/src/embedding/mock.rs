use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{Embedder, Embedding, EmbeddingError};

/// Table-driven embedder for tests. Unknown texts map to `fallback`.
pub struct MockEmbedder {
    vectors: HashMap<String, Embedding>,
    fallback: Embedding,
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(fallback: Embedding) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: impl Into<String>, vector: Embedding) -> Self {
        self.vectors.insert(text.into(), vector);
        self
    }

    /// Number of `embed_batch` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| self.vectors.get(t).unwrap_or(&self.fallback).clone())
            .collect())
    }

    fn model(&self) -> &str {
        "mock"
    }
}
