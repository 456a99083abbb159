use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::errors::{Result, WizardError};

pub mod anthropic;
pub mod gemini;
pub mod openai;

/// A text-completion backend. Callers never branch on the vendor.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, prompt: &str, system: Option<&str>, max_tokens: u32) -> Result<String>;

    fn name(&self) -> &str;
}

pub type DynProvider = Box<dyn LlmProvider + Send + Sync>;

/// Everything needed to reach one provider. The key is supplied from the
/// environment or custom settings and never stored with the form data.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub api_key: String,
    /// Full request URL; `None` means the provider's public endpoint.
    pub endpoint: Option<String>,
    pub verify_ssl: bool,
}

impl ProviderConfig {
    pub fn new(provider: ProviderKind, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
            endpoint: None,
            verify_ssl: true,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| default_endpoint(self.provider).to_string())
    }
}

pub fn default_endpoint(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::OpenAI => "https://api.openai.com/v1/chat/completions",
        ProviderKind::Perplexity => "https://api.perplexity.ai/chat/completions",
        ProviderKind::DeepSeek => "https://api.deepseek.com/chat/completions",
        ProviderKind::Claude => "https://api.anthropic.com/v1/messages",
        ProviderKind::Gemini => {
            "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
        }
        ProviderKind::Custom => "",
    }
}

/// Where the generated text sits in a provider's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    OpenAiCompatible,
    Claude,
    Gemini,
}

impl From<ProviderKind> for ResponseShape {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Claude => ResponseShape::Claude,
            ProviderKind::Gemini => ResponseShape::Gemini,
            _ => ResponseShape::OpenAiCompatible,
        }
    }
}

/// Pull the generated text out of a response body. Unknown shapes give "".
pub fn extract_text(shape: ResponseShape, body: &Value) -> String {
    let text = match shape {
        ResponseShape::OpenAiCompatible => body.pointer("/choices/0/message/content"),
        ResponseShape::Claude => body.pointer("/content/0/text"),
        ResponseShape::Gemini => body.pointer("/candidates/0/content/parts/0/text"),
    };
    text.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn error_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .or_else(|| body.get("error").filter(|v| v.is_string()))
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Turn an HTTP response into a JSON body, mapping non-2xx statuses to
/// [`WizardError::Provider`].
pub(crate) async fn read_json(provider: &str, resp: Response) -> Result<Value> {
    let status = resp.status();
    let text = resp.text().await?;
    tracing::debug!(provider, %status, bytes = text.len(), "provider responded");

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| error_message(&v))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        return Err(WizardError::Provider { status: status.as_u16(), message });
    }

    serde_json::from_str(&text).map_err(|_| WizardError::Parse(format!("failed to parse {provider} response")))
}

pub(crate) fn build_client(timeout_secs: u64, verify_ssl: bool) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .danger_accept_invalid_certs(!verify_ssl)
        .build()?)
}

pub fn make_provider(cfg: &ProviderConfig, timeout_secs: u64) -> Result<DynProvider> {
    if cfg.api_key.trim().is_empty() && cfg.provider != ProviderKind::Custom {
        return Err(WizardError::MissingInput(format!("no API key configured for {}", cfg.provider)));
    }
    if cfg.model.trim().is_empty() {
        return Err(WizardError::MissingInput(format!("no model configured for {}", cfg.provider)));
    }
    let client = build_client(timeout_secs, cfg.verify_ssl)?;

    match cfg.provider {
        ProviderKind::OpenAI | ProviderKind::Perplexity | ProviderKind::DeepSeek | ProviderKind::Custom => {
            let endpoint = cfg.endpoint();
            if endpoint.trim().is_empty() {
                return Err(WizardError::MissingInput("custom provider needs an endpoint".into()));
            }
            Ok(Box::new(openai::OpenAiCompatible::new(
                cfg.provider.as_str(),
                endpoint,
                cfg.model.clone(),
                cfg.api_key.clone(),
                client,
            )))
        }
        ProviderKind::Claude => Ok(Box::new(anthropic::Claude::new(
            cfg.endpoint(),
            cfg.model.clone(),
            cfg.api_key.clone(),
            client,
        ))),
        ProviderKind::Gemini => Ok(Box::new(gemini::Gemini::new(
            cfg.endpoint(),
            cfg.model.clone(),
            cfg.api_key.clone(),
            client,
        ))),
    }
}
