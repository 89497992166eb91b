//! LLM client abstraction.
//!
//! The narrative builder only needs "send a system + user prompt, get one
//! JSON object back". `HttpLlmClient` does that against an OpenAI-compatible
//! chat completions API; `FakeLlmClient` scripts replies for tests.

use crate::config::LlmConfig;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// LLM errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM is disabled in configuration")]
    Disabled,

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("LLM returned empty response")]
    EmptyResponse,
}

/// Text-generation collaborator that answers with a single JSON object
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn call_json(&self, system_prompt: &str, user_prompt: &str) -> Result<Value, LlmError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// OpenAI-compatible chat completions client
pub struct HttpLlmClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl HttpLlmClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else {
            LlmError::HttpError(format!("Request failed: {}", e))
        }
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn call_json(&self, system_prompt: &str, user_prompt: &str) -> Result<Value, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "response_format": {"type": "json_object"},
        });

        let mut request = self.client.post(self.completions_url()).json(&request_body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        debug!("Calling {} with model {}", self.config.endpoint, self.config.model);
        let response = request.send().await.map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(LlmError::HttpError(format!(
                "HTTP {} from {}",
                response.status(),
                self.config.endpoint
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidJson(format!("Failed to parse response: {}", e)))?;

        let text = extract_content(&response_json).ok_or(LlmError::EmptyResponse)?;
        parse_json_object(text)
    }
}

/// `choices[0].message.content` of a chat completion
fn extract_content(response: &Value) -> Option<&str> {
    response
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("message"))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
}

/// Parse model output, which must be a JSON object
pub fn parse_json_object(text: &str) -> Result<Value, LlmError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| LlmError::InvalidJson(format!("LLM output is not valid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(LlmError::InvalidJson(
            "LLM output is not a JSON object".to_string(),
        ));
    }
    Ok(value)
}

// ============================================================================
// Fake Client
// ============================================================================

/// Scripted client for tests.
///
/// With several queued replies each call pops the next one; the last reply
/// is repeated forever.
pub struct FakeLlmClient {
    responses: Mutex<Vec<Result<Value, LlmError>>>,
    prompts: Mutex<Vec<(String, String)>>,
    delay: Option<Duration>,
}

impl FakeLlmClient {
    pub fn new(responses: Vec<Result<Value, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn always_valid(json: Value) -> Self {
        Self::new(vec![Ok(json)])
    }

    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// (system, user) prompt pairs received so far
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl LlmClient for FakeLlmClient {
    async fn call_json(&self, system_prompt: &str, user_prompt: &str) -> Result<Value, LlmError> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        match responses.len() {
            0 => Err(LlmError::EmptyResponse),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}
