use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{extract_text, read_json, LlmProvider, ResponseShape};
use crate::errors::Result;

pub struct Gemini {
    url: String,
    model: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
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
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

impl GenerateContentRequest {
    pub(crate) fn new(prompt: &str, system: Option<&str>, max_tokens: u32) -> Self {
        let text = |t: &str| Content { parts: vec![Part { text: t.to_string() }] };
        Self {
            contents: vec![text(prompt)],
            system_instruction: system.map(text),
            generation_config: GenerationConfig { temperature: 0.7, max_output_tokens: max_tokens },
        }
    }
}

impl Gemini {
    /// `url` may contain a `{model}` placeholder.
    pub fn new(url: String, model: String, api_key: String, client: Client) -> Self {
        let url = url.replace("{model}", &model);
        Self { url, model, api_key, client }
    }
}

#[async_trait]
impl LlmProvider for Gemini {
    async fn complete(&self, prompt: &str, system: Option<&str>, max_tokens: u32) -> Result<String> {
        let body = GenerateContentRequest::new(prompt, system, max_tokens);
        tracing::debug!(url = %self.url, model = %self.model, "POST gemini generateContent");

        let resp = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let json = read_json("gemini", resp).await?;
        Ok(extract_text(ResponseShape::Gemini, &json))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
