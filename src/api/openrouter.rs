// OpenRouter API client for proxying chat completions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ProxyError;
use crate::config::OpenRouterConfig;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 800;

/// Inbound chat request from the browser.
///
/// Every field stays an opaque value: shape and range checks are left to
/// the upstream. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Option<Value>,
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub max_tokens: Option<Value>,
    #[serde(default)]
    pub response_format: Option<Value>,
}

/// Body sent to `/chat/completions`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UpstreamRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Value>,
    pub temperature: Value,
    pub max_tokens: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

impl UpstreamRequest {
    /// Falsy sampling values (`0`, `false`, `""`) take the defaults and a
    /// falsy `response_format` is dropped; everything else goes out verbatim.
    pub fn from_chat(request: ChatRequest, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: request.messages,
            temperature: truthy(request.temperature)
                .unwrap_or_else(|| Value::from(DEFAULT_TEMPERATURE)),
            max_tokens: truthy(request.max_tokens)
                .unwrap_or_else(|| Value::from(DEFAULT_MAX_TOKENS)),
            response_format: truthy(request.response_format),
        }
    }
}

fn truthy(value: Option<Value>) -> Option<Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    api_key: String,
    base_url: String,
    site_url: String,
    app_title: String,
    http_client: reqwest::Client,
}

impl OpenRouterClient {
    /// Returns `MissingApiKey` when the config carries no credential.
    /// `base_url` is expected already normalized by `AppConfig`.
    pub fn from_config(
        config: &OpenRouterConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, ProxyError> {
        let api_key = config.api_key.clone().ok_or(ProxyError::MissingApiKey)?;
        Ok(Self {
            api_key,
            base_url: config.base_url.clone(),
            site_url: config.site_url.clone(),
            app_title: config.app_title.clone(),
            http_client,
        })
    }

    /// One POST, no retry. Success bodies come back untouched.
    pub async fn chat_completions(&self, request: &UpstreamRequest) -> Result<Value, ProxyError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("Forwarding chat completion: model={}, url={}", request.model, url);

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.app_title)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("OpenRouter API error: {} {}", status.as_u16(), body);
            tracing::error!(
                "Request body: {}",
                serde_json::to_string_pretty(request).unwrap_or_default()
            );
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        Ok(body)
    }
}
