// Configuration module for the mentor chat proxy

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_PATH_ENV: &str = "MENTOR_PROXY_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Keys accepted on inbound requests. Empty leaves the proxy open.
    #[serde(default)]
    pub api_keys: Vec<String>,

    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_keys: Vec::new(),
            openrouter: OpenRouterConfig::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

/// Upstream provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OpenRouterConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default = "default_app_title")]
    pub app_title: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            site_url: default_site_url(),
            app_title: default_app_title(),
            base_url: default_base_url(),
        }
    }
}

fn default_model() -> String {
    "openai/gpt-4o-mini".to_string()
}

fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_app_title() -> String {
    "Learning Path Agent".to_string()
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

impl AppConfig {
    /// Build the process config: `.env`, optional YAML file, then environment.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {:?}", path);
        }

        let mut config = match non_empty(std::env::var(CONFIG_PATH_ENV).ok()) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.normalize();

        tracing::info!(
            "Config loaded: model={}, base_url={}, credential_configured={}",
            config.openrouter.model,
            config.openrouter.base_url,
            config.openrouter.api_key.is_some()
        );
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        tracing::info!("Config file read from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let mut config: AppConfig = serde_yaml::from_str(content)?;
        config.normalize();
        Ok(config)
    }

    /// Overlay environment variables. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        if let Some(key) = get("OPENROUTER_API_KEY") {
            self.openrouter.api_key = Some(key);
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.openrouter.model = model;
        }
        if let Some(site_url) = get("NEXT_PUBLIC_SITE_URL") {
            self.openrouter.site_url = site_url;
        }
        if let Some(base_url) = get("OPENROUTER_BASE_URL") {
            self.openrouter.base_url = base_url;
        }
        if let Some(host) = get("MENTOR_PROXY_HOST") {
            self.host = host;
        }
        if let Some(port) = get("MENTOR_PROXY_PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("Invalid MENTOR_PROXY_PORT: {}", port))?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        let key = self.openrouter.api_key.take();
        self.openrouter.api_key = non_empty(key);
        while self.openrouter.base_url.ends_with('/') {
            self.openrouter.base_url.pop();
        }
        if self.host.is_empty() {
            self.host = default_host();
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
