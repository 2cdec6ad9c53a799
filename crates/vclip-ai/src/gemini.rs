//! `GeminiAiClient`: a Gemini-compatible `AiClient` implementation.
//!
//! Mirrors the model-fallback-and-retry shape of the teacher's Gemini
//! client: try the primary model, fall back to a backup model on
//! non-retryable error, retry a handful of times with exponential
//! backoff on 5xx. Single-flight behind a `governor` rate limiter.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AiError, AiResult};
use crate::parsing::parse_score_batch;
use crate::AiClient;

type Limiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

const MAX_RETRIES: u32 = 3;

/// Static configuration for the AI co-processor, per spec.md §6
/// (`ai.enabled`, `ai.model`, `ai.backupModel`, `ai.visionModel`,
/// `ai.rateLimitPerSec`, `ai.apiKey`).
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub backup_model: String,
    pub vision_model: String,
    pub rate_limit_per_sec: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            backup_model: "gemini-2.5-flash-lite".to_string(),
            vision_model: "gemini-2.5-flash".to_string(),
            rate_limit_per_sec: 1,
        }
    }
}

pub struct GeminiAiClient {
    config: AiConfig,
    client: Client,
    limiter: Arc<Limiter>,
}

impl GeminiAiClient {
    pub fn new(config: AiConfig) -> Self {
        let rate = NonZeroU32::new(config.rate_limit_per_sec.max(1)).unwrap();
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rate)));
        Self {
            config,
            client: Client::new(),
            limiter,
        }
    }

    async fn call_model(&self, model: &str, prompt: &str) -> AiResult<String> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            model, self.config.api_key
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let mut attempt = 0;
        loop {
            self.limiter.until_ready().await;

            let response = self.client.post(&url).json(&request).send().await?;
            let status = response.status();

            if status.is_success() {
                let body: GenerateContentResponse = response.json().await?;
                let text = body
                    .candidates
                    .into_iter()
                    .next()
                    .and_then(|c| c.content.parts.into_iter().next())
                    .map(|p| p.text)
                    .ok_or_else(|| AiError::ParseFailed("empty candidates list".to_string()))?;
                return Ok(text);
            }

            if status.is_server_error() && attempt < MAX_RETRIES {
                attempt += 1;
                let backoff = Duration::from_millis(250 * 2u64.pow(attempt));
                warn!(model, %status, attempt, "retrying after server error");
                tokio::time::sleep(backoff).await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(AiError::RequestFailed {
                model: model.to_string(),
                message: format!("{status}: {body}"),
            });
        }
    }

    async fn call_with_fallback(&self, prompt: &str) -> AiResult<String> {
        if self.config.api_key.is_empty() {
            return Err(AiError::NotConfigured);
        }

        for model in [self.config.model.as_str(), self.config.backup_model.as_str()] {
            match self.call_model(model, prompt).await {
                Ok(text) => {
                    info!(model, "AI co-processor call succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(model, error = %e, "AI co-processor call failed, trying next model");
                }
            }
        }

        Err(AiError::AllModelsFailed(format!(
            "both {} and {} failed",
            self.config.model, self.config.backup_model
        )))
    }
}

#[async_trait::async_trait]
impl AiClient for GeminiAiClient {
    async fn text_batch(
        &self,
        system_prompt: &str,
        prompt: &str,
        expected_len: usize,
    ) -> AiResult<Vec<f64>> {
        let full_prompt = format!(
            "{system_prompt}\n\nReturn ONLY a JSON array of exactly {expected_len} numbers in \
             [0, 1], one per segment, and nothing else.\n\n{prompt}"
        );
        let text = self.call_with_fallback(&full_prompt).await?;
        Ok(parse_score_batch(&text, expected_len))
    }

    async fn vision(&self, prompt: &str, image_url: &str) -> AiResult<String> {
        if self.config.api_key.is_empty() {
            return Err(AiError::NotConfigured);
        }
        let full_prompt = format!("{prompt}\n\nImage: {image_url}");
        self.limiter.until_ready().await;
        self.call_model(&self.config.vision_model, &full_prompt)
            .await
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_fallback_models() {
        let cfg = AiConfig::default();
        assert_ne!(cfg.model, cfg.backup_model);
        assert_eq!(cfg.rate_limit_per_sec, 1);
    }

    #[tokio::test]
    async fn unconfigured_client_returns_not_configured() {
        let client = GeminiAiClient::new(AiConfig::default());
        let err = client.text_batch("sys", "prompt", 3).await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured));
    }
}
