pub mod config;
pub mod embedding;
pub mod llm;
pub mod pdf;
pub mod vector_store;

pub use config::{ChunkingConfig, Config, EmbeddingConfig, LlmConfig};
pub use embedding::OpenAiEmbedding;
pub use llm::OpenAiLlm;
pub use pdf::load_pdf;
pub use vector_store::{InMemoryVectorStore, PgVectorStore};
