use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::MaxTokens;
use crate::errors::{Result, WizardError};
use crate::form::{Field, FormData, FormPatch, FormStore};
use crate::parse;
use crate::prompt;
use crate::provider::LlmProvider;
use crate::schema::{self, SchemaPlaceholders};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationKind {
    Titles,
    Descriptions,
    Tags,
    Article,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GenerationToken(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Titles(Vec<String>),
    Descriptions(Vec<String>),
    Tags(Vec<String>),
    Article(String),
}

impl Output {
    pub fn kind(&self) -> GenerationKind {
        match self {
            Output::Titles(_) => GenerationKind::Titles,
            Output::Descriptions(_) => GenerationKind::Descriptions,
            Output::Tags(_) => GenerationKind::Tags,
            Output::Article(_) => GenerationKind::Article,
        }
    }

    fn into_patch(self) -> FormPatch {
        match self {
            Output::Titles(v) => FormPatch { generated_titles: Some(v), ..Default::default() },
            Output::Descriptions(v) => FormPatch { generated_descriptions: Some(v), ..Default::default() },
            Output::Tags(v) => FormPatch {
                tags: Some(v.join(", ")),
                generated_tags: Some(v),
                ..Default::default()
            },
            Output::Article(a) => FormPatch { generated_article: Some(a), ..Default::default() },
        }
    }
}

/// Result of one provider round trip, not yet applied to the form.
#[derive(Debug, Clone)]
pub struct Generated {
    pub token: GenerationToken,
    pub prompt: String,
    pub raw: String,
    pub output: Output,
}

/// Issues a monotonically increasing token per request and remembers the
/// newest one for each kind.
#[derive(Default)]
struct Sequencer {
    next: AtomicU64,
    latest: Mutex<HashMap<GenerationKind, GenerationToken>>,
}

impl Sequencer {
    fn issue(&self, kind: GenerationKind) -> GenerationToken {
        let token = GenerationToken(self.next.fetch_add(1, Ordering::SeqCst) + 1);
        self.latest.lock().insert(kind, token);
        token
    }

    fn is_latest(&self, kind: GenerationKind, token: GenerationToken) -> bool {
        self.latest.lock().get(&kind) == Some(&token)
    }
}

/// Counts outstanding requests of one kind until dropped.
struct InFlight<'a> {
    counts: &'a Mutex<HashMap<GenerationKind, usize>>,
    kind: GenerationKind,
}

impl<'a> InFlight<'a> {
    fn enter(counts: &'a Mutex<HashMap<GenerationKind, usize>>, kind: GenerationKind) -> Self {
        *counts.lock().entry(kind).or_insert(0) += 1;
        Self { counts, kind }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut counts = self.counts.lock();
        if let Some(n) = counts.get_mut(&self.kind) {
            *n = n.saturating_sub(1);
            if *n == 0 {
                counts.remove(&self.kind);
            }
        }
    }
}

pub struct Generator {
    max_tokens: MaxTokens,
    seq: Sequencer,
    in_flight: Mutex<HashMap<GenerationKind, usize>>,
}

fn require(data: &FormData, field: Field, what: &str) -> Result<()> {
    if data.is_filled(field) {
        Ok(())
    } else {
        Err(WizardError::MissingInput(format!("{field} is required to generate {what}")))
    }
}

impl Generator {
    pub fn new(max_tokens: MaxTokens) -> Self {
        Self { max_tokens, seq: Sequencer::default(), in_flight: Mutex::new(HashMap::new()) }
    }

    pub fn is_generating(&self, kind: GenerationKind) -> bool {
        self.in_flight.lock().contains_key(&kind)
    }

    async fn run(
        &self,
        provider: &dyn LlmProvider,
        kind: GenerationKind,
        prompt: String,
        max_tokens: u32,
    ) -> Result<(GenerationToken, String, String)> {
        let token = self.seq.issue(kind);
        let _guard = InFlight::enter(&self.in_flight, kind);

        tracing::info!(?kind, provider = provider.name(), token = token.0, "generating");
        let raw = provider.complete(&prompt, Some(prompt::system_prompt()), max_tokens).await?;
        if raw.trim().is_empty() {
            tracing::warn!(?kind, provider = provider.name(), "provider returned no text");
        }
        Ok((token, prompt, raw))
    }

    pub async fn titles(&self, provider: &dyn LlmProvider, data: &FormData) -> Result<Generated> {
        require(data, Field::FocusKeyword, "titles")?;
        let (token, prompt, raw) = self
            .run(provider, GenerationKind::Titles, prompt::titles_prompt(data), self.max_tokens.titles)
            .await?;
        let output = Output::Titles(parse::parse_candidates(&raw, prompt::TITLE_COUNT));
        Ok(Generated { token, prompt, raw, output })
    }

    pub async fn descriptions(&self, provider: &dyn LlmProvider, data: &FormData) -> Result<Generated> {
        require(data, Field::FocusKeyword, "descriptions")?;
        require(data, Field::MetaTitle, "descriptions")?;
        let (token, prompt, raw) = self
            .run(
                provider,
                GenerationKind::Descriptions,
                prompt::descriptions_prompt(data),
                self.max_tokens.descriptions,
            )
            .await?;
        let output = Output::Descriptions(parse::parse_candidates(&raw, prompt::DESCRIPTION_COUNT));
        Ok(Generated { token, prompt, raw, output })
    }

    pub async fn tags(&self, provider: &dyn LlmProvider, data: &FormData) -> Result<Generated> {
        require(data, Field::FocusKeyword, "tags")?;
        require(data, Field::MetaTitle, "tags")?;
        let (token, prompt, raw) = self
            .run(provider, GenerationKind::Tags, prompt::tags_prompt(data), self.max_tokens.tags)
            .await?;
        let output = Output::Tags(parse::parse_tags(&raw));
        Ok(Generated { token, prompt, raw, output })
    }

    pub async fn article(&self, provider: &dyn LlmProvider, data: &FormData) -> Result<Generated> {
        require(data, Field::FocusKeyword, "an article")?;
        require(data, Field::MetaTitle, "an article")?;
        let (token, prompt, raw) = self
            .run(provider, GenerationKind::Article, prompt::article_prompt(data), self.max_tokens.article)
            .await?;
        let output = Output::Article(raw.trim().to_string());
        Ok(Generated { token, prompt, raw, output })
    }

    /// Apply a result only if no newer request of the same kind was issued.
    pub fn accept(&self, store: &mut FormStore, generated: Generated) -> Result<bool> {
        let kind = generated.output.kind();
        if !self.seq.is_latest(kind, generated.token) {
            tracing::info!(?kind, token = generated.token.0, "discarding superseded result");
            return Ok(false);
        }
        store.update(generated.output.into_patch())?;
        Ok(true)
    }

    /// The prompt flow renders the article instruction without calling a provider.
    pub fn prompt_text(&self, store: &mut FormStore) -> Result<String> {
        require(store.data(), Field::FocusKeyword, "a prompt")?;
        let text = prompt::article_prompt(store.data());
        store.update(FormPatch { generated_prompt: Some(text.clone()), ..Default::default() })?;
        Ok(text)
    }

    pub fn schema(&self, store: &mut FormStore, placeholders: &SchemaPlaceholders) -> Result<String> {
        require(store.data(), Field::MetaTitle, "schema markup")?;
        let markup = schema::for_form(store.data(), placeholders)?;
        store.update(FormPatch { schema_markup: Some(markup.clone()), ..Default::default() })?;
        Ok(markup)
    }
}
