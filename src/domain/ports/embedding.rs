use crate::domain::{errors::RagError, Embedding};
use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, RagError>;
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, RagError>;
    fn dimension(&self) -> usize;
}
