//! Retrieval-augmented question answering over a single PDF.
//!
//! Two binaries share this library. `ingest` loads a PDF, splits it into
//! overlapping chunks, embeds each chunk and stores the vectors in Postgres
//! with the pgvector extension. `chat` answers questions from stdin by
//! retrieving the most similar chunks and prompting a chat model with them.

pub mod application;
pub mod domain;
pub mod infrastructure;
