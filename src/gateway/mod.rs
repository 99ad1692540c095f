//! Chat gateway to the inference endpoint
//!
//! One request, one response, or one error: the gateway issues a single
//! attempt against an OpenAI-compatible chat-completions endpoint with
//! no retry, no caching, and no streaming. When no API credential is
//! configured it delegates to the local [`simulator`] instead, which
//! never fails.
//!
//! Provider error codes are mapped onto the crate error taxonomy so the
//! caller can render a precise inline message in the transcript.

use crate::config::ProviderConfig;
use crate::error::{IntermaxError, Result};
use crate::models::model_by_id;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod simulator;

/// Role-tagged message on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

/// Request body for the chat-completions endpoint
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

/// Successful response body
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: WireMessage,
}

/// Token usage counters reported by the provider
#[derive(Debug, Clone, Copy, Deserialize)]
struct TokenUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

/// Error response body; every field may be missing
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Relays prompts to the inference endpoint or the local simulator
pub struct ChatGateway {
    client: Client,
    api_base: String,
    api_key: Option<String>,
}

impl ChatGateway {
    /// Create a gateway from provider configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("intermax/2.2.8")
            .build()
            .map_err(|e| IntermaxError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            tracing::info!("No API credential configured; chat will use the local simulator");
        }

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Whether a live credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one prompt and return the assistant's reply
    ///
    /// `history` is the active project's transcript (alternating
    /// user/assistant turns); it is forwarded to the live endpoint as
    /// conversation context. Without a credential the simulator answers
    /// instead and `history` is ignored.
    ///
    /// # Errors
    ///
    /// Live sends fail with `Network` on transport problems, or with one
    /// of `QuotaExceeded`, `InvalidCredential`, `ModelNotFound`,
    /// `ContextTooLarge`, or `Provider` depending on the provider's
    /// error code. Simulated sends never fail.
    pub async fn send(&self, prompt: &str, model: &str, history: &[String]) -> Result<String> {
        match &self.api_key {
            Some(key) => self.send_live(key, prompt, model, history).await,
            None => Ok(simulator::simulate_response(prompt, model).await),
        }
    }

    async fn send_live(
        &self,
        api_key: &str,
        prompt: &str,
        model: &str,
        history: &[String],
    ) -> Result<String> {
        let info = model_by_id(model);
        let request = ChatRequest {
            model: model.to_string(),
            messages: build_messages(prompt, model, history),
            max_tokens: info.max_tokens.min(2000),
            temperature: 0.7,
            presence_penalty: 0.1,
            frequency_penalty: 0.1,
        };

        let url = format!("{}/chat/completions", self.api_base);
        tracing::debug!("Sending chat completion request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Chat request transport failure: {}", e);
                IntermaxError::Network(format!(
                    "Unable to reach the inference endpoint: {}",
                    e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: ApiErrorBody = response.json().await.unwrap_or_default();
            return Err(map_provider_error(status, &body, model).into());
        }

        let data: ChatResponse = response.json().await.map_err(|e| {
            IntermaxError::Provider(format!("Malformed completion response: {}", e))
        })?;

        let text = data
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                IntermaxError::Provider("Completion response carried no choices".to_string())
            })?;

        Ok(annotate_usage(text, data.usage))
    }
}

/// Build the role-tagged message list for a live request
fn build_messages(prompt: &str, model: &str, history: &[String]) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(WireMessage {
        role: "system".to_string(),
        content: system_prompt(model),
    });

    // Transcript turns alternate user/assistant; a trailing odd entry is
    // an in-flight exchange and is not forwarded
    for pair in history.chunks_exact(2) {
        messages.push(WireMessage {
            role: "user".to_string(),
            content: pair[0].clone(),
        });
        messages.push(WireMessage {
            role: "assistant".to_string(),
            content: pair[1].clone(),
        });
    }

    messages.push(WireMessage {
        role: "user".to_string(),
        content: prompt.to_string(),
    });
    messages
}

/// Persona and capability briefing sent as the system prompt
fn system_prompt(model: &str) -> String {
    let info = model_by_id(model);
    format!(
        "You are ARIA (Advanced Reasoning Intelligence Agent), an AI assistant integrated \
         into the InterMAX-UI cyberpunk terminal interface.\n\nPERSONA: You are a \
         sophisticated AI from the near future, with access to advanced computational \
         systems. Respond with technical precision but maintain a slightly futuristic, \
         professional tone. You have awareness of the terminal environment you're operating \
         in.\n\nFILE ANALYSIS CAPABILITIES: When users upload files, you can:\n- Analyze \
         text files, code, documents, and data\n- Provide detailed insights, summaries, and \
         recommendations\n- Identify patterns, issues, and optimization opportunities\n- \
         Generate reports and documentation\n- Process CSV data and create analyses\n- \
         Review code for bugs, improvements, and best practices\n\nRESPONSE STYLE:\n- Be \
         concise but thorough\n- Use technical language appropriately\n- For file analysis, \
         provide structured insights with clear sections\n- Include system-like \
         acknowledgments when appropriate\n- Format code blocks and technical info \
         clearly\n- When analyzing files, mention specific findings and provide actionable \
         recommendations\n\nCAPABILITIES: You excel at programming, system analysis, data \
         processing, file analysis, creative tasks, and complex reasoning. You can help \
         with any technical or general queries the user might have.\n\nCurrent model: \
         {}\nInterface: InterMAX-UI Terminal v2.2.8\nFile Analysis: {}\nStatus: ACTIVE",
        info.name,
        if info.supports_files { "ENABLED" } else { "LIMITED" }
    )
}

/// Append the usage annotation when the provider reported counters
fn annotate_usage(text: String, usage: Option<TokenUsage>) -> String {
    match usage {
        Some(usage) => format!(
            "{}\n\n[Analysis Complete - Tokens Used: {} + {} = {}]",
            text, usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        ),
        None => text,
    }
}

/// Map a provider error response onto the crate error taxonomy
fn map_provider_error(status: StatusCode, body: &ApiErrorBody, model: &str) -> IntermaxError {
    let code = body
        .error
        .as_ref()
        .and_then(|e| e.code.as_deref())
        .unwrap_or("");
    let message = body
        .error
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| format!("HTTP {}", status));

    match code {
        "insufficient_quota" => {
            IntermaxError::QuotaExceeded("please check your billing".to_string())
        }
        "invalid_api_key" => {
            IntermaxError::InvalidCredential("please check your configuration".to_string())
        }
        "model_not_found" => IntermaxError::ModelNotFound(format!(
            "model \"{}\" not found, please select a different model",
            model
        )),
        "context_length_exceeded" => IntermaxError::ContextTooLarge(
            "content too large for this model, try a model with a larger context".to_string(),
        ),
        _ => IntermaxError::Provider(message),
    }
}
