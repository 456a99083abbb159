use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{extract_text, read_json, LlmProvider, ResponseShape};
use crate::errors::Result;

pub const API_VERSION: &str = "2023-06-01";

pub struct Claude {
    url: String,
    model: String,
    api_key: String,
    client: Client,
}

#[derive(Serialize)]
pub(crate) struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Msg<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> MsgRequest<'a> {
    pub(crate) fn new(model: &'a str, prompt: &'a str, system: Option<&'a str>, max_tokens: u32) -> Self {
        Self {
            model,
            max_tokens,
            messages: vec![Msg { role: "user", content: prompt }],
            system,
        }
    }
}

impl Claude {
    pub fn new(url: String, model: String, api_key: String, client: Client) -> Self {
        Self { url, model, api_key, client }
    }
}

#[async_trait]
impl LlmProvider for Claude {
    async fn complete(&self, prompt: &str, system: Option<&str>, max_tokens: u32) -> Result<String> {
        let body = MsgRequest::new(&self.model, prompt, system, max_tokens);
        tracing::debug!(url = %self.url, model = %self.model, "POST anthropic messages");

        let resp = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let json = read_json("claude", resp).await?;
        Ok(extract_text(ResponseShape::Claude, &json))
    }

    fn name(&self) -> &str {
        "claude"
    }
}
