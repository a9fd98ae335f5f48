//! HTTP completion oracle
//!
//! Posts an OpenAI/Mistral-style chat-completion request and returns
//! the first choice's text. One call per prompt, no retry; every
//! failure path collapses to `None`, which the caller treats as
//! "no response".

use async_trait::async_trait;
use masque_core::CompletionOracle;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::OracleConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion oracle over HTTP
pub struct HttpOracle {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpOracle {
    /// Build an oracle from daemon configuration; the API key is read
    /// from the configured environment variable
    pub fn from_config(config: &OracleConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            warn!(
                "Oracle enabled but {} is not set; requests will be unauthenticated",
                config.api_key_env
            );
        }
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            model: config.model.clone(),
            api_key,
        }
    }
}

#[async_trait]
impl CompletionOracle for HttpOracle {
    async fn complete(&self, prompt: &str) -> Option<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Oracle request failed: {}", e);
                return None;
            }
        };
        if !response.status().is_success() {
            warn!("Oracle returned {}", response.status());
            return None;
        }

        match response.json::<ChatResponse>().await {
            Ok(parsed) => parsed
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content),
            Err(e) => {
                warn!("Oracle response unparsable: {}", e);
                None
            }
        }
    }
}
