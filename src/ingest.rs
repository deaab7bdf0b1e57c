use std::sync::Arc;

use pdf_rag::application::IngestionService;
use pdf_rag::domain::ports::VectorStore;
use pdf_rag::infrastructure::{load_pdf, Config, OpenAiEmbedding, PgVectorStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ingest=info,pdf_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!(path = %config.pdf_path, "reading and splitting the PDF");
    let pages = load_pdf(&config.pdf_path)?;

    let store = Arc::new(
        PgVectorStore::connect(
            &config.database_url,
            &config.collection,
            config.embedding.dimension,
        )
        .await?,
    );
    let embedding = Arc::new(OpenAiEmbedding::from_config(&config.embedding));

    let service = IngestionService::new(
        embedding,
        store.clone(),
        config.chunking.chunk_size,
        config.chunking.chunk_overlap,
    )
    .with_reset(config.reset_collection);

    info!("inserting chunks into the database");
    let stored = service.ingest(&config.pdf_path, &pages).await?;
    if stored == 0 {
        println!("No text to process, nothing was stored.");
        return Ok(());
    }

    let total = store.count().await?;
    println!(
        "Stored {stored} chunks in collection '{}' ({total} rows total).",
        config.collection
    );

    Ok(())
}
