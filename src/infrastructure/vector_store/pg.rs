use async_trait::async_trait;
use pgvector::Vector;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::domain::{
    ports::VectorStore, ChunkMetadata, DocumentChunk, Embedding, RagError, SearchResult,
};

/// Vector store backed by Postgres with the pgvector extension.
///
/// All chunks live in one `rag_chunks` table; rows are partitioned by the
/// `collection` column so several collections can share a database.
/// Similarity search uses pgvector's cosine distance operator (`<=>`) and
/// reports scores as `1 - distance`.
pub struct PgVectorStore {
    pool: PgPool,
    collection: String,
    dimension: usize,
}

impl PgVectorStore {
    pub async fn connect(
        url: &str,
        collection: &str,
        dimension: usize,
    ) -> Result<Self, RagError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .map_err(db_err)?;

        let store = Self {
            pool,
            collection: collection.to_string(),
            dimension,
        };
        store.ensure_schema().await?;

        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), RagError> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        // The vector dimension is fixed at table creation; switching the
        // embedding model requires dropping the table and re-ingesting.
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS rag_chunks (
                id UUID PRIMARY KEY,
                collection TEXT NOT NULL,
                content TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                metadata JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                embedding VECTOR({}) NOT NULL
            )",
            self.dimension
        );
        sqlx::query(&ddl).execute(&self.pool).await.map_err(db_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS rag_chunks_collection_idx ON rag_chunks (collection)",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

fn db_err(e: sqlx::Error) -> RagError {
    RagError::database(e.to_string())
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn upsert(
        &self,
        chunk: &DocumentChunk,
        embedding: &Embedding,
    ) -> Result<(), RagError> {
        if embedding.dimension() != self.dimension {
            return Err(RagError::validation(format!(
                "embedding dimension {} does not match collection dimension {}",
                embedding.dimension(),
                self.dimension
            )));
        }

        let metadata = serde_json::to_value(&chunk.metadata)
            .map_err(|e| RagError::internal(e.to_string()))?;

        sqlx::query(
            "INSERT INTO rag_chunks \
             (id, collection, content, chunk_index, metadata, created_at, embedding) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO UPDATE SET content = EXCLUDED.content, embedding = EXCLUDED.embedding",
        )
        .bind(chunk.id)
        .bind(&self.collection)
        .bind(&chunk.content)
        .bind(chunk.chunk_index as i32)
        .bind(metadata)
        .bind(chunk.created_at)
        .bind(Vector::from(embedding.as_slice().to_vec()))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RagError> {
        let rows = sqlx::query(
            "SELECT id, content, chunk_index, metadata, created_at, \
             1 - (embedding <=> $1) AS score \
             FROM rag_chunks \
             WHERE collection = $2 \
             ORDER BY embedding <=> $1 \
             LIMIT $3",
        )
        .bind(Vector::from(query.as_slice().to_vec()))
        .bind(&self.collection)
        .bind(top_k as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|row| {
                let metadata: ChunkMetadata =
                    serde_json::from_value(row.try_get("metadata").map_err(db_err)?)
                        .map_err(|e| RagError::internal(e.to_string()))?;

                let chunk = DocumentChunk {
                    id: row.try_get("id").map_err(db_err)?,
                    content: row.try_get("content").map_err(db_err)?,
                    chunk_index: row.try_get::<i32, _>("chunk_index").map_err(db_err)? as usize,
                    metadata,
                    created_at: row.try_get("created_at").map_err(db_err)?,
                };
                let score: f64 = row.try_get("score").map_err(db_err)?;

                Ok(SearchResult {
                    chunk,
                    score: score as f32,
                })
            })
            .collect()
    }

    async fn delete_collection(&self) -> Result<(), RagError> {
        sqlx::query("DELETE FROM rag_chunks WHERE collection = $1")
            .bind(&self.collection)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn count(&self) -> Result<usize, RagError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM rag_chunks WHERE collection = $1")
            .bind(&self.collection)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        let count: i64 = row.try_get("count").map_err(db_err)?;
        Ok(count as usize)
    }
}
