//! Groq chat-completions agent
//!
//! Talks to Groq's OpenAI-compatible API.
//! Uses a long-lived reqwest::Client for connection pooling.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::agent::{Agent, AgentProfile};
use crate::config::GroqConfig;
use crate::error::RouterError;
use crate::models::RawResponse;

/// Reusable Groq client (connection-pooled)
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqClient {
    pub fn new(config: &GroqConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system + user exchange and return the first choice's message
    pub async fn complete(&self, system_prompt: &str, query: &str) -> crate::Result<ChoiceMessage> {
        if self.api_key.is_empty() {
            return Err(RouterError::AgentNotConfigured(
                "GROQ_API_KEY not configured".to_string(),
            ));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let request = build_request(&self.model, system_prompt, query);

        info!(model = %self.model, "Calling Groq API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Groq API request failed: {}", e);
                RouterError::AgentError(format!("Groq API error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "Groq API error response: {}", error_text);
            return Err(RouterError::AgentError(format!(
                "Groq API returned {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Groq response: {}", e);
            RouterError::AgentError(format!("Groq parse error: {}", e))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| RouterError::AgentError("No choices in Groq response".to_string()))
    }
}

/// Agent backed by a Groq model and a fixed profile
pub struct GroqAgent {
    profile: AgentProfile,
    system_prompt: String,
    client: Arc<GroqClient>,
}

impl GroqAgent {
    pub fn new(profile: AgentProfile, client: Arc<GroqClient>) -> Self {
        let system_prompt = profile.system_prompt();
        Self {
            profile,
            system_prompt,
            client,
        }
    }
}

#[async_trait]
impl Agent for GroqAgent {
    fn name(&self) -> &str {
        &self.profile.name
    }

    fn role(&self) -> &str {
        &self.profile.role
    }

    async fn run(&self, query: &str) -> crate::Result<RawResponse> {
        let message = self.client.complete(&self.system_prompt, query).await?;
        info!(agent = %self.profile.name, "Groq response received");
        Ok(message.into_raw_response())
    }
}

fn build_request<'a>(model: &'a str, system_prompt: &'a str, query: &'a str) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: vec![
            RequestMessage {
                role: "system",
                content: system_prompt,
            },
            RequestMessage {
                role: "user",
                content: query,
            },
        ],
        temperature: 0.3,
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

/// Assistant message of a completion choice.
/// `content` is null when the model answers with tool calls only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<serde_json::Value>,
}

impl ChoiceMessage {
    fn into_raw_response(self) -> RawResponse {
        match self.content {
            Some(content) if !content.trim().is_empty() => RawResponse::structured(content),
            _ => match serde_json::to_value(&self) {
                Ok(value) => RawResponse::opaque(value),
                Err(_) => RawResponse::plain(format!("{:?}", self)),
            },
        }
    }
}
