//! Application layer - the two pipelines.
//!
//! Services orchestrate domain logic against the domain ports (traits)
//! rather than concrete adapters: `IngestionService` turns extracted PDF
//! pages into stored embeddings, `RagService` turns a question into a
//! grounded answer.

pub mod services;

pub use services::{IngestionService, RagService};
