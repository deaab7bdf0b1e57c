use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;

use crate::domain::RagError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub collection: String,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
    pub top_k: usize,
    pub pdf_path: String,
    pub reset_collection: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Config {
    /// Reads configuration from the environment, failing fast when a
    /// required variable is missing or a numeric one does not parse.
    pub fn from_env() -> Result<Self, RagError> {
        // rig's OpenAI client reads the key from the environment itself;
        // only its presence is validated here.
        require("OPENAI_API_KEY")?;

        let config = Self {
            database_url: require("PGVECTOR_URL")?,
            collection: require("PGVECTOR_COLLECTION")?,
            llm: LlmConfig {
                model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
            },
            embedding: EmbeddingConfig {
                model: env_or("EMBEDDING_MODEL", "text-embedding-3-small"),
                dimension: env_parse("EMBEDDING_DIMENSION", 1536)?,
            },
            chunking: ChunkingConfig {
                chunk_size: env_parse("CHUNK_SIZE", 1000)?,
                chunk_overlap: env_parse("CHUNK_OVERLAP", 150)?,
            },
            top_k: env_parse("TOP_K", 10)?,
            pdf_path: env_or("PDF_PATH", "document.pdf"),
            reset_collection: env_parse("RESET_COLLECTION", true)?,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), RagError> {
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(RagError::validation(format!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(RagError::validation("TOP_K must be at least 1"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/pdf_rag".to_string(),
            collection: "pdf_rag".to_string(),
            llm: LlmConfig {
                model: "gpt-4o-mini".to_string(),
            },
            embedding: EmbeddingConfig {
                model: "text-embedding-3-small".to_string(),
                dimension: 1536,
            },
            chunking: ChunkingConfig {
                chunk_size: 1000,
                chunk_overlap: 150,
            },
            top_k: 10,
            pdf_path: "document.pdf".to_string(),
            reset_collection: true,
        }
    }
}

fn require(key: &str) -> Result<String, RagError> {
    std::env::var(key)
        .map_err(|_| RagError::validation(format!("environment variable {key} is not set")))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> Result<T, RagError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|e| {
            RagError::validation(format!("environment variable {key} is invalid: {e}"))
        }),
        Err(_) => Ok(default),
    }
}
