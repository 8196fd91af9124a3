//! Translation through any OpenAI-compatible chat completions endpoint
//! (llama.cpp server, Ollama, DeepSeek, OpenAI).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

use super::traits::{Translator, TranslatorInfo};
use crate::config::{Lang, OpenAiConfig, language_name};
use crate::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_RATE_LIMIT_WAIT_SECS: u64 = 5;

pub struct OpenAiTranslator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    attempts: u32,
    retry_delay: Duration,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// What one HTTP round trip produced.
enum Attempt {
    Translated(String),
    /// Worth retrying after the usual delay
    Failed(Error),
    /// Server asked us to wait this long first
    Throttled(Error, Duration),
}

impl OpenAiTranslator {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::TranslationRequest(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            attempts: config.retry_count.max(1),
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    fn build_request<'a>(&'a self, text: &str, source: &Lang, target: &Lang) -> ChatRequest<'a> {
        let instruction = format!(
            "You translate {} text into {}. Reply with the translation only.",
            prompt_language_name(source),
            prompt_language_name(target),
        );

        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: instruction,
                },
                ChatMessage {
                    role: "user",
                    content: text.to_string(),
                },
            ],
            temperature: Some(0.2),
        }
    }

    async fn attempt(&self, request: &ChatRequest<'_>) -> Attempt {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Attempt::Failed(Error::TranslationTimeout),
            Err(e) => return Attempt::Failed(Error::TranslationRequest(e.to_string())),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let wait = Duration::from_secs(retry_after.unwrap_or(DEFAULT_RATE_LIMIT_WAIT_SECS));
            return Attempt::Throttled(Error::TranslationRateLimited { retry_after }, wait);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Attempt::Failed(Error::TranslationRequest(format!("HTTP {status}: {body}")));
        }

        match response.json::<ChatResponse>().await {
            Ok(parsed) => parsed.choices.into_iter().next().map_or_else(
                || {
                    Attempt::Failed(Error::TranslationInvalidResponse(
                        "response had no choices".to_string(),
                    ))
                },
                |choice| Attempt::Translated(clean_response(&choice.message.content)),
            ),
            Err(e) => Attempt::Failed(Error::TranslationInvalidResponse(e.to_string())),
        }
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: "OpenAI Compatible",
            local: false,
        }
    }

    async fn translate(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        if text.trim().is_empty() || source == target {
            return Ok(text.to_string());
        }

        let request = self.build_request(text, source, target);
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            debug!("POST {} (attempt {}/{})", self.endpoint, attempt, self.attempts);

            let wait = match self.attempt(&request).await {
                Attempt::Translated(text) => return Ok(text),
                Attempt::Throttled(e, wait) => {
                    warn!("Rate limited, waiting {:?}", wait);
                    last_error = Some(e);
                    wait
                }
                Attempt::Failed(e) => {
                    warn!("Translation request failed: {}", e);
                    last_error = Some(e);
                    self.retry_delay
                }
            };

            if attempt < self.attempts {
                tokio::time::sleep(wait).await;
            }
        }

        error!("Giving up after {} attempts", self.attempts);
        Err(last_error.unwrap_or(Error::TranslationMaxRetriesExceeded))
    }
}

/// Strip whitespace and the quotes models like to wrap answers in.
fn clean_response(content: &str) -> String {
    content
        .trim()
        .trim_start_matches('"')
        .trim_end_matches('"')
        .to_string()
}

/// Language name for prompts; unknown codes fall back to a generic phrase.
fn prompt_language_name(lang: &Lang) -> &'static str {
    language_name(lang.as_str()).unwrap_or("the specified language")
}
