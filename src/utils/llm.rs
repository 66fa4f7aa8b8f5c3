use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::LlmSettings;

#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured, so no request was attempted.
    #[error("LLM API key is not configured")]
    NotConfigured,
    /// Connection failures, timeouts, non-2xx statuses and unreadable bodies, as reported
    /// by the `reqwest` HTTP client library.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered with a well-formed envelope that had no usable content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

/// Sends a prompt to a language model and hands back its raw answer text.
///
/// One call to `send` is at most one outbound request. Retries are not done here.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Debug, Default)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of `choices[0].message.content`, if it holds anything but whitespace.
    fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

/// Client for an OpenAI-compatible chat-completion endpoint.
///
/// The request timeout lives on the underlying HTTP client.
#[derive(Debug)]
pub struct OpenAiGateway {
    http_client: Client,
    settings: LlmSettings,
}

impl OpenAiGateway {
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        let http_client = Client::builder().timeout(settings.timeout).build()?;
        Ok(OpenAiGateway {
            http_client,
            settings,
        })
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }
}

#[async_trait]
impl ChatGateway for OpenAiGateway {
    async fn send(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = match self.settings.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => return Err(LlmError::NotConfigured),
        };

        let body = ChatCompletionRequest {
            model: &self.settings.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.settings.temperature,
        };

        tracing::info!(
            "[LLM] Sending chart analysis request to {} (model {})",
            self.settings.api_url,
            self.settings.model
        );

        let res = self
            .http_client
            .post(self.settings.api_url.clone())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let envelope: ChatCompletionResponse = res.json().await?;
        let content = envelope.into_content().ok_or(LlmError::EmptyResponse)?;

        tracing::debug!("[LLM] Raw model content: {}", content);
        Ok(content)
    }
}
