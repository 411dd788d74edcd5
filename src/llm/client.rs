//! HTTP client for the slow-path planner
//!
//! The model only ever returns text; nothing it says is executed without
//! going through the plan parser and the engine.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::config::AgentConfig;
use crate::core::error::{AgentError, Result};

/// Wire protocol spoken by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    Anthropic,
    /// Chat completions: OpenAI, DeepSeek, llama.cpp, vLLM, ...
    OpenAI,
}

impl ApiFormat {
    /// Anthropic is recognised by host; everything else speaks chat completions
    pub fn for_url(url: &str) -> Self {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }
}

pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    api_format: ApiFormat,
}

/// Upper bound on reply length; a plan is a few hundred tokens
const MAX_TOKENS: u32 = 2048;

const ANTHROPIC_VERSION: &str = "2023-06-01";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

impl LlmClient {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_format: ApiFormat::for_url(&api_url),
            api_key,
            api_url,
            model,
        }
    }

    /// Endpoint and model from config, overridable by `LLM_API_URL` and
    /// `LLM_MODEL`; the key must come from `LLM_API_KEY`
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::Llm("LLM_API_KEY not set".into()))?;
        let api_url = std::env::var("LLM_API_URL").unwrap_or_else(|_| config.llm_api_url.clone());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| config.llm_model.clone());

        Ok(Self::new(api_key, api_url, model))
    }

    pub fn api_format(&self) -> ApiFormat {
        self.api_format
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for a single reply and return its text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        tracing::debug!("Planner request to {} ({:?})", self.model, self.api_format);
        let reply = match self.api_format {
            ApiFormat::Anthropic => {
                let body = AnthropicRequest {
                    model: &self.model,
                    max_tokens: MAX_TOKENS,
                    system,
                    messages: [Message::user(user)],
                };
                let request = self
                    .client
                    .post(&self.api_url)
                    .header("x-api-key", &self.api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body);
                let response: AnthropicResponse = Self::send(request).await?;
                response.content.into_iter().find_map(|block| block.text)
            }
            ApiFormat::OpenAI => {
                let body = OpenAIRequest {
                    model: &self.model,
                    max_tokens: MAX_TOKENS,
                    temperature: 0.0,
                    messages: [Message::system(system), Message::user(user)],
                };
                let request = self.client.post(&self.api_url).bearer_auth(&self.api_key).json(&body);
                let response: OpenAIResponse = Self::send(request).await?;
                response.choices.into_iter().next().map(|c| c.message.content)
            }
        };
        reply
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AgentError::Llm("model returned no text".into()))
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| AgentError::Llm(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AgentError::Llm(format!("{}: {}", status, detail.trim())));
        }
        response.json().await.map_err(|e| AgentError::Llm(e.to_string()))
    }
}

// === Wire formats ===

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

/// Non-text blocks carry no `text`
#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [Message<'a>; 2],
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> Message<'a> {
    fn system(content: &'a str) -> Self {
        Self { role: "system", content }
    }

    fn user(content: &'a str) -> Self {
        Self { role: "user", content }
    }
}
