mod in_memory;
mod pg;

pub use in_memory::InMemoryVectorStore;
pub use pg::PgVectorStore;
