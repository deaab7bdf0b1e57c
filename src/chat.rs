use std::io::{self, Write};
use std::sync::Arc;

use pdf_rag::application::RagService;
use pdf_rag::infrastructure::{Config, OpenAiEmbedding, OpenAiLlm, PgVectorStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Sentinel inputs that end the interactive loop.
const EXIT_COMMANDS: &[&str] = &["sair", "exit", "quit"];

fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS.contains(&input.trim().to_lowercase().as_str())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat=info,pdf_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let store = Arc::new(
        PgVectorStore::connect(
            &config.database_url,
            &config.collection,
            config.embedding.dimension,
        )
        .await?,
    );
    let embedding = Arc::new(OpenAiEmbedding::from_config(&config.embedding));
    let llm = Arc::new(OpenAiLlm::from_config(&config.llm));
    let rag = RagService::new(embedding, store, llm, config.top_k);

    let stdin = io::stdin();
    loop {
        print!("\nAsk a question (or 'sair' to quit): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            // EOF on stdin ends the session like the sentinel does.
            break;
        }

        if is_exit_command(&line) {
            println!("Ending the chat. Goodbye!");
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let answer = rag.answer(&line).await?;
        println!("{answer}");
    }

    Ok(())
}
