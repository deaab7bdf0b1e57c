use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{ports::VectorStore, DocumentChunk, Embedding, RagError, SearchResult};

/// Process-local store with brute-force cosine search. Stands in for the
/// Postgres store in tests and database-free setups.
pub struct InMemoryVectorStore {
    chunks: RwLock<Vec<(DocumentChunk, Embedding)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(
        &self,
        chunk: &DocumentChunk,
        embedding: &Embedding,
    ) -> Result<(), RagError> {
        let mut store = self
            .chunks
            .write()
            .map_err(|e| RagError::internal(e.to_string()))?;

        store.retain(|(c, _)| c.id != chunk.id);
        store.push((chunk.clone(), embedding.clone()));
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RagError> {
        let store = self
            .chunks
            .read()
            .map_err(|e| RagError::internal(e.to_string()))?;

        let mut results: Vec<SearchResult> = store
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(results.into_iter().take(top_k).collect())
    }

    async fn delete_collection(&self) -> Result<(), RagError> {
        let mut store = self
            .chunks
            .write()
            .map_err(|e| RagError::internal(e.to_string()))?;

        store.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, RagError> {
        let store = self
            .chunks
            .read()
            .map_err(|e| RagError::internal(e.to_string()))?;

        Ok(store.len())
    }
}
