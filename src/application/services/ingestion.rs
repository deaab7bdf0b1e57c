use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::{
    chunk_pages,
    ports::{EmbeddingService, VectorStore},
    PageText, RagError,
};

pub struct IngestionService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    chunk_size: usize,
    chunk_overlap: usize,
    reset_collection: bool,
}

impl IngestionService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        chunk_size: usize,
        chunk_overlap: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            chunk_size,
            chunk_overlap,
            reset_collection: true,
        }
    }

    /// Controls whether the collection is cleared before new chunks are
    /// stored. With reset disabled, re-ingestion appends fresh rows and the
    /// stored count grows.
    pub fn with_reset(mut self, reset_collection: bool) -> Self {
        self.reset_collection = reset_collection;
        self
    }

    /// Chunks the extracted pages, embeds every chunk and stores the rows.
    /// Returns the number of chunks stored; zero extractable chunks leaves
    /// the store untouched.
    #[instrument(skip(self, pages), fields(page_count = pages.len()))]
    pub async fn ingest(&self, source: &str, pages: &[PageText]) -> Result<usize, RagError> {
        let chunks = chunk_pages(source, pages, self.chunk_size, self.chunk_overlap);
        if chunks.is_empty() {
            info!("no text chunks to process");
            return Ok(0);
        }
        info!(chunks = chunks.len(), "embedding chunks");

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let embeddings = self.embedding.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(RagError::internal(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        if self.reset_collection {
            self.vector_store.delete_collection().await?;
        }

        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            self.vector_store.upsert(chunk, embedding).await?;
        }

        info!(chunks = chunks.len(), "chunks stored");
        Ok(chunks.len())
    }
}
