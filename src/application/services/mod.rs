mod ingestion;
mod rag;

pub use ingestion::IngestionService;
pub use rag::{RagService, INSUFFICIENT_CONTEXT_REPLY};
