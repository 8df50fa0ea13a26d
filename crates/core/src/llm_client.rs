use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;

/// The text generation capability of the remote provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generates a reply for a flattened, role-tagged conversation.
    ///
    /// A reply without text content is returned as an empty string; only
    /// transport or protocol failures are errors.
    async fn generate(&self, prompt: String) -> Result<String>;
}

/// An implementation of `LLMClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The specific model identifier to use for chat completions (e.g., "gpt-4o-mini").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl LLMClient for OpenAICompatibleClient {
    async fn generate(&self, prompt: String) -> Result<String> {
        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "Requesting chat completion"
        );

        // The whole conversation travels as one tagged text blob.
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .context("Chat completion request failed")?;

        let choice = response
            .choices
            .first()
            .context("No response choice from LLM")?;

        Ok(choice.message.content.clone().unwrap_or_default())
    }
}
