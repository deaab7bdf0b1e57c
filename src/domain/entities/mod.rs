mod document;
mod embedding;

pub use document::{chunk_pages, ChunkMetadata, DocumentChunk, PageText, SearchResult};
pub use embedding::Embedding;
