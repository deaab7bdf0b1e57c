use crate::domain::{errors::RagError, DocumentChunk, Embedding, SearchResult};
use async_trait::async_trait;

#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn upsert(&self, chunk: &DocumentChunk, embedding: &Embedding)
        -> Result<(), RagError>;
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RagError>;
    /// Removes every chunk stored under this store's collection.
    async fn delete_collection(&self) -> Result<(), RagError>;
    async fn count(&self) -> Result<usize, RagError>;
}
