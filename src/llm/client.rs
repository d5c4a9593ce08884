use super::types::*;
use crate::{
    Error, Result,
    config::{LlmConfig, PipelineConfig},
};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;

    /// Runs a single persona-driven completion and returns the reply text.
    ///
    /// `persona` becomes the system message. `context` carries the outputs of
    /// earlier steps and is appended to the instructions when non-empty.
    async fn complete(&self, persona: &str, instructions: &str, context: &str) -> Result<String> {
        let mut user_content = instructions.trim_end().to_string();
        if !context.trim().is_empty() {
            user_content.push_str("\n\nContext from previous steps:\n");
            user_content.push_str(context.trim());
        }

        let request = ChatCompletionRequest {
            messages: vec![ChatMessage::system(persona), ChatMessage::user(user_content)],
            max_tokens: None,
            temperature: None,
        };

        let response = self.create_chat_completion(request).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| Error::llm("LLM returned an empty response"))
    }
}

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key);

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url);
        }

        // A failed call fails its stage; async-openai would otherwise retry 429/5xx.
        let no_retries = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(openai_config).with_backoff(no_retries);
        let defaults = PipelineConfig::default();

        Self {
            client,
            model: config.model,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
        }
    }

    /// Applies the sampling settings used when a request leaves them unset.
    pub fn with_pipeline_options(mut self, pipeline: &PipelineConfig) -> Self {
        self.temperature = pipeline.temperature;
        self.max_tokens = pipeline.max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        debug!(
            "Creating chat completion with {} messages",
            request.messages.len()
        );

        let mut messages = Vec::with_capacity(request.messages.len());
        for msg in &request.messages {
            messages.push(msg.to_openai_message()?);
        }

        let mut request_builder = openai_types::CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature.unwrap_or(self.temperature));

        if let Some(max_tokens) = request.max_tokens.or(self.max_tokens) {
            request_builder.max_completion_tokens(max_tokens);
        }

        let openai_request = request_builder.build()?;

        let response = self.client.chat().create(openai_request).await?;

        debug!(
            "Received chat completion response with {} choices",
            response.choices.len()
        );

        let choices = response
            .choices
            .into_iter()
            .map(|choice| Choice {
                index: choice.index,
                message: ChatMessage::assistant(choice.message.content.unwrap_or_default()),
                finish_reason: choice.finish_reason.map(|fr| format!("{fr:?}")),
            })
            .collect();

        let usage = response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatCompletionResponse {
            id: response.id,
            model: response.model,
            choices,
            usage,
        })
    }
}
