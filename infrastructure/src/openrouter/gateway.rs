//! OpenRouter gateway adapter
//!
//! Implements the model gateway port over OpenRouter's chat completions
//! API. Owns retry with exponential backoff, request timeouts, and the
//! structured-JSON extraction that shields callers from chatty models.

use super::protocol::{ChatRequest, ChatResponse, ErrorResponse};
use crate::config::GatewaySettings;
use async_trait::async_trait;
use conclave_application::{CompletionOptions, GatewayError, ModelGateway};
use conclave_domain::{Message, Model, extract_json_object};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

/// Gateway to OpenRouter-hosted models
pub struct OpenRouterGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl OpenRouterGateway {
    /// Build a gateway from settings. Fails fast when no API key is
    /// available; nothing downstream can work without one.
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let api_key = settings
            .resolved_api_key()
            .ok_or_else(|| {
                GatewayError::Configuration(
                    "No API key; set OPENROUTER_API_KEY or [gateway].api_key".to_string(),
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_retries: settings.max_retries,
        })
    }

    async fn send_once(
        &self,
        model: &Model,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, CallError> {
        let mut request = ChatRequest::new(model.as_str(), messages)
            .with_temperature(options.temperature)
            .with_max_tokens(options.max_tokens);
        if options.json_mode {
            request = request.json_object();
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(CallError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CallError {
                message: format!("{}: {}", status, message),
                retryable: is_retryable_status(status),
            });
        }

        let body: ChatResponse = response.json().await.map_err(CallError::from_reqwest)?;
        body.into_content().ok_or_else(|| CallError {
            message: "response contained no choices".to_string(),
            retryable: true,
        })
    }
}

#[async_trait]
impl ModelGateway for OpenRouterGateway {
    async fn complete(
        &self,
        model: &Model,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<String, GatewayError> {
        let mut last_error = GatewayError::Upstream("no attempt made".to_string());

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << attempt);
                debug!(model = model.as_str(), attempt, ?delay, "Retrying");
                tokio::time::sleep(delay).await;
            }

            match self.send_once(model, messages, &options).await {
                Ok(text) => {
                    if !options.json_mode {
                        return Ok(text);
                    }
                    // Malformed JSON replies burn a retry like any other
                    // transient failure
                    match usable_json_object(&text) {
                        Some(object) => return Ok(object.to_string()),
                        None => {
                            warn!(
                                model = model.as_str(),
                                attempt, "No decodable JSON object in reply"
                            );
                            last_error = GatewayError::MalformedResponse(truncate(&text, 200));
                        }
                    }
                }
                Err(e) if e.retryable => {
                    warn!(model = model.as_str(), attempt, "Call failed: {}", e.message);
                    last_error = GatewayError::Upstream(e.message);
                }
                Err(e) => return Err(GatewayError::Upstream(e.message)),
            }
        }

        Err(last_error)
    }
}

struct CallError {
    message: String,
    retryable: bool,
}

impl CallError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        Self {
            message: e.to_string(),
            // Connect/timeout/decode failures are all worth another try
            retryable: true,
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Extract the JSON object from a reply and confirm it actually decodes.
///
/// Balanced braces alone are not enough; a reply like `{'consensus': false}`
/// extracts cleanly but is not JSON, and callers must never see it as a
/// success.
fn usable_json_object(text: &str) -> Option<&str> {
    let slice = extract_json_object(text)?;
    serde_json::from_str::<serde_json::Value>(slice).ok()?;
    Some(slice)
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        text.to_string()
    } else {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
