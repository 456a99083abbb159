use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{extract_text, read_json, LlmProvider, ResponseShape};
use crate::errors::Result;

/// Chat-completions style endpoint: OpenAI, Perplexity, DeepSeek and any
/// custom server speaking the same protocol.
pub struct OpenAiCompatible {
    name: String,
    url: String,
    model: String,
    api_key: String,
    client: Client,
}

impl OpenAiCompatible {
    pub fn new(name: &str, url: String, model: String, api_key: String, client: Client) -> Self {
        Self { name: name.to_string(), url, model, api_key, client }
    }
}

pub fn request_body(model: &str, prompt: &str, system: Option<&str>, max_tokens: u32) -> Value {
    let mut messages = Vec::new();
    if let Some(system) = system {
        messages.push(json!({ "role": "system", "content": system }));
    }
    messages.push(json!({ "role": "user", "content": prompt }));
    json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_tokens,
        "temperature": 0.7,
    })
}

#[async_trait]
impl LlmProvider for OpenAiCompatible {
    async fn complete(&self, prompt: &str, system: Option<&str>, max_tokens: u32) -> Result<String> {
        let body = request_body(&self.model, prompt, system, max_tokens);
        tracing::debug!(provider = %self.name, url = %self.url, model = %self.model, "POST chat completion");

        let mut req = self.client.post(&self.url).json(&body);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }
        let resp = req.send().await?;
        let json = read_json(&self.name, resp).await?;
        Ok(extract_text(ResponseShape::OpenAiCompatible, &json))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
