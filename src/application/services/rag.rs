use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, LlmService, VectorStore},
    RagError, SearchResult,
};

/// The fixed reply the prompt instructs the model to give when the
/// retrieved context does not contain the answer. Grounding is enforced by
/// the template wording only, not programmatically.
pub const INSUFFICIENT_CONTEXT_REPLY: &str =
    "I do not have enough information to answer that question.";

pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    llm: Arc<dyn LlmService>,
    top_k: usize,
}

impl RagService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmService>,
        top_k: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            llm,
            top_k,
        }
    }

    #[instrument(skip(self), fields(top_k = self.top_k))]
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>, RagError> {
        let embedding = self.embedding.embed(question).await?;
        self.vector_store.search(&embedding, self.top_k).await
    }

    /// Answers a question grounded in the stored document: embed, search,
    /// fill the prompt template with the retrieved context, complete.
    #[instrument(skip(self))]
    pub async fn answer(&self, question: &str) -> Result<String, RagError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(RagError::validation("question must not be empty"));
        }

        let results = self.retrieve(question).await?;
        let context = results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = build_prompt(&context, question);
        self.llm.complete(&prompt).await
    }
}

fn build_prompt(context: &str, question: &str) -> String {
    format!(
        r#"CONTEXT:
{context}

RULES:
- Answer only with information stated in the CONTEXT.
- If the information is not explicitly in the CONTEXT, reply:
  "{reply}"
- Never invent facts or use outside knowledge.
- Never offer opinions or interpretations beyond what is written.

EXAMPLES OF OUT-OF-CONTEXT QUESTIONS:
Question: "What is the capital of France?"
Reply: "{reply}"

Question: "How many clients did we have in 2024?"
Reply: "{reply}"

USER QUESTION:
{question}

ANSWER THE USER QUESTION."#,
        reply = INSUFFICIENT_CONTEXT_REPLY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentChunk, Embedding};
    use crate::infrastructure::InMemoryVectorStore;
    use async_trait::async_trait;

    struct AxisEmbedding;

    // Maps known texts onto fixed axes so similarity ordering is exact.
    #[async_trait]
    impl EmbeddingService for AxisEmbedding {
        async fn embed(&self, text: &str) -> Result<Embedding, RagError> {
            let vec = match text {
                t if t.contains("fee") => vec![1.0, 0.0, 0.0],
                t if t.contains("risk") => vec![0.0, 1.0, 0.0],
                _ => vec![0.0, 0.0, 1.0],
            };
            Ok(Embedding::new(vec))
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, RagError> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    /// Echoes the prompt back so tests can inspect what the model was sent.
    struct EchoLlm;

    #[async_trait]
    impl LlmService for EchoLlm {
        async fn complete(&self, prompt: &str) -> Result<String, RagError> {
            Ok(prompt.to_string())
        }
    }

    async fn seeded_service(top_k: usize) -> RagService {
        let embedding = Arc::new(AxisEmbedding);
        let store = Arc::new(InMemoryVectorStore::new());

        for (i, content) in ["the fee is 2%", "risk grade is high", "unrelated note"]
            .iter()
            .enumerate()
        {
            let chunk = DocumentChunk::new(*content, i);
            let vector = embedding.embed(content).await.unwrap();
            store.upsert(&chunk, &vector).await.unwrap();
        }

        RagService::new(embedding, store, Arc::new(EchoLlm), top_k)
    }

    #[tokio::test]
    async fn test_retrieve_orders_by_similarity() {
        let service = seeded_service(2).await;
        let results = service.retrieve("what is the fee?").await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "the fee is 2%");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_answer_prompt_carries_context_and_question() {
        let service = seeded_service(1).await;
        let prompt = service.answer("what is the fee?").await.unwrap();

        assert!(prompt.contains("the fee is 2%"));
        assert!(prompt.contains("what is the fee?"));
        assert!(prompt.contains(INSUFFICIENT_CONTEXT_REPLY));
    }

    #[tokio::test]
    async fn test_answer_rejects_empty_question() {
        let service = seeded_service(1).await;

        let err = service.answer("   ").await.unwrap_err();
        assert!(matches!(err, RagError::Validation(_)));
    }

    #[tokio::test]
    async fn test_empty_retrieval_still_instructs_insufficient_context() {
        let embedding = Arc::new(AxisEmbedding);
        let store = Arc::new(InMemoryVectorStore::new());
        let service = RagService::new(embedding, store, Arc::new(EchoLlm), 10);

        let prompt = service.answer("anything at all").await.unwrap();
        assert!(prompt.starts_with("CONTEXT:\n\n"));
        assert!(prompt.contains(INSUFFICIENT_CONTEXT_REPLY));
    }

    #[test]
    fn test_build_prompt_fills_placeholders() {
        let prompt = build_prompt("ctx text", "a question");

        assert!(prompt.contains("CONTEXT:\nctx text"));
        assert!(prompt.contains("USER QUESTION:\na question"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{question}"));
    }
}
