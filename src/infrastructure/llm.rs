use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::openai;

use crate::domain::{ports::LlmService, RagError};
use crate::infrastructure::config::LlmConfig;

/// OpenAI chat completion adapter. Temperature is pinned to 0.0 so answers
/// stay close to the retrieved context.
pub struct OpenAiLlm {
    model: String,
}

impl OpenAiLlm {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(&config.model)
    }
}

#[async_trait]
impl LlmService for OpenAiLlm {
    async fn complete(&self, prompt: &str) -> Result<String, RagError> {
        let client = openai::Client::from_env();
        let agent = client.agent(&self.model).temperature(0.0).build();
        agent
            .prompt(prompt)
            .await
            .map_err(|e| RagError::external(e.to_string()))
    }
}
