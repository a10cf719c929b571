//! Gemini provider implementation for Maguai
//!
//! This module implements the Provider trait over the Gemini REST
//! `generateContent` endpoint. Upstream error bodies are parsed into a
//! structured [`UpstreamFault`] so callers can classify by kind instead of
//! by message text.

use crate::config::GeminiConfig;
use crate::error::{MaguaiError, Result};
use crate::providers::{
    FaultKind, GenerateRequest, GenerateResponse, Provider, TokenUsage, UpstreamFault,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use maguai::config::GeminiConfig;
/// use maguai::providers::{GeminiProvider, GenerateRequest, GenerationConfig, Provider, Turn};
///
/// # async fn example() -> maguai::error::Result<()> {
/// let provider = GeminiProvider::new(GeminiConfig::default())?;
/// let request = GenerateRequest {
///     contents: vec![Turn::user("Hello!")],
///     system_instruction: "Be concise.".to_string(),
///     config: GenerationConfig { temperature: 0.7, thinking: None },
/// };
/// let response = provider.generate(&request).await?;
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    system_instruction: GeminiSystemInstruction,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<GeminiThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiThinkingConfig {
    thinking_budget: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    include_thoughts: bool,
}

/// Response body from `generateContent`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
    #[serde(default)]
    thoughts_token_count: usize,
    #[serde(default)]
    total_token_count: usize,
}

/// Error envelope: `{"error": {"code", "message", "status"}}`
#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use maguai::config::GeminiConfig;
    /// use maguai::providers::GeminiProvider;
    ///
    /// let provider = GeminiProvider::new(GeminiConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("maguai/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MaguaiError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini provider: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Endpoint for the configured model
    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Convert a provider-neutral request to the Gemini wire shape
    fn convert_request(request: &GenerateRequest) -> GeminiRequest {
        let contents = request
            .contents
            .iter()
            .map(|turn| GeminiContent {
                role: turn.role.as_str().to_string(),
                parts: vec![GeminiPart {
                    text: turn.text.clone(),
                }],
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: request.system_instruction.clone(),
                }],
            },
            generation_config: GeminiGenerationConfig {
                temperature: request.config.temperature,
                thinking_config: request.config.thinking.map(|t| GeminiThinkingConfig {
                    thinking_budget: t.budget_tokens,
                    include_thoughts: t.include_thoughts,
                }),
            },
        }
    }

    /// Pull answer text and reasoning trace out of the first candidate
    fn convert_response(response: GeminiResponse) -> GenerateResponse {
        let usage = response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            thinking_tokens: u.thoughts_token_count,
            total_tokens: u.total_token_count,
        });

        let parts = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let mut text = String::new();
        let mut thoughts = String::new();
        for part in parts {
            let Some(chunk) = part.text else { continue };
            if part.thought {
                thoughts.push_str(&chunk);
            } else {
                text.push_str(&chunk);
            }
        }

        GenerateResponse {
            text: (!text.is_empty()).then_some(text),
            thoughts: (!thoughts.is_empty()).then_some(thoughts),
            usage,
        }
    }

    /// Build a structured fault from a non-success response
    fn parse_fault(status: u16, body: &str) -> UpstreamFault {
        match serde_json::from_str::<GeminiErrorEnvelope>(body) {
            Ok(envelope) => {
                let reported = envelope.error.status.as_deref().map(FaultKind::from_status);
                UpstreamFault {
                    status,
                    reported: reported.is_some(),
                    kind: reported.unwrap_or_else(|| FaultKind::from_http_status(status)),
                    message: envelope.error.message.unwrap_or_else(|| body.to_string()),
                }
            }
            Err(_) => UpstreamFault {
                status,
                kind: FaultKind::from_http_status(status),
                message: body.to_string(),
                reported: false,
            },
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let body = Self::convert_request(request);

        tracing::debug!(
            "Sending Gemini request: {} turns, thinking_budget={:?}",
            body.contents.len(),
            body.generation_config
                .thinking_config
                .as_ref()
                .map(|t| t.thinking_budget)
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                MaguaiError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let fault = Self::parse_fault(status.as_u16(), &error_text);
            tracing::error!("Gemini returned error {}", fault);
            return Err(MaguaiError::Upstream(fault).into());
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            MaguaiError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        let converted = Self::convert_response(gemini_response);
        if let Some(usage) = &converted.usage {
            tracing::debug!(
                "Gemini usage: prompt_tokens={}, completion_tokens={}, thinking_tokens={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.thinking_tokens
            );
        }

        Ok(converted)
    }

    fn model_name(&self) -> String {
        self.config.model.clone()
    }
}
