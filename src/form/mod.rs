use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::errors::{Result, WizardError};
use crate::storage::PersistenceService;

pub mod fields;
pub mod migrate;

pub use fields::{AdvancedSettings, ApiSettings, ArticleSize, Elements, Field, Niche, SeoLevel, Tone};

pub const CURRENT_SCHEMA_VERSION: &str = "2";

/// Every field collected or generated across the wizard steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub focus_keyword: String,
    pub meta_title: String,
    pub meta_description: String,
    /// Comma-separated, as shown to the user and fed to the schema builder.
    pub tags: String,
    pub niche: Niche,
    pub seo_level: SeoLevel,
    pub tone: Tone,
    pub article_size: ArticleSize,
    pub elements: Elements,
    pub advanced: AdvancedSettings,
    pub generated_titles: Vec<String>,
    pub generated_descriptions: Vec<String>,
    pub generated_tags: Vec<String>,
    pub generated_article: String,
    pub generated_prompt: String,
    pub schema_markup: String,
    pub api_settings: Option<ApiSettings>,
    pub schema_version: String,
}

impl Default for FormData {
    fn default() -> Self {
        Self {
            focus_keyword: String::new(),
            meta_title: String::new(),
            meta_description: String::new(),
            tags: String::new(),
            niche: Niche::default(),
            seo_level: SeoLevel::default(),
            tone: Tone::default(),
            article_size: ArticleSize::default(),
            elements: Elements::default(),
            advanced: AdvancedSettings::default(),
            generated_titles: Vec::new(),
            generated_descriptions: Vec::new(),
            generated_tags: Vec::new(),
            generated_article: String::new(),
            generated_prompt: String::new(),
            schema_markup: String::new(),
            api_settings: None,
            schema_version: CURRENT_SCHEMA_VERSION.into(),
        }
    }
}

impl FormData {
    pub fn is_filled(&self, field: Field) -> bool {
        let value = match field {
            Field::FocusKeyword => &self.focus_keyword,
            Field::MetaTitle => &self.meta_title,
            Field::MetaDescription => &self.meta_description,
            Field::Tags => &self.tags,
            Field::GeneratedArticle => &self.generated_article,
            Field::GeneratedPrompt => &self.generated_prompt,
            Field::SchemaMarkup => &self.schema_markup,
        };
        !value.trim().is_empty()
    }
}

/// A partial update. Only `Some` fields are written by [`FormStore::update`].
#[derive(Debug, Clone, Default)]
pub struct FormPatch {
    pub focus_keyword: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub tags: Option<String>,
    pub niche: Option<Niche>,
    pub seo_level: Option<SeoLevel>,
    pub tone: Option<Tone>,
    pub article_size: Option<ArticleSize>,
    pub elements: Option<Elements>,
    pub advanced: Option<AdvancedSettings>,
    pub generated_titles: Option<Vec<String>>,
    pub generated_descriptions: Option<Vec<String>>,
    pub generated_tags: Option<Vec<String>>,
    pub generated_article: Option<String>,
    pub generated_prompt: Option<String>,
    pub schema_markup: Option<String>,
    pub api_settings: Option<Option<ApiSettings>>,
}

macro_rules! merge_fields {
    ($target:ident, $patch:ident, $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $patch.$field {
                $target.$field = v;
            }
        )+
    };
}

impl FormPatch {
    pub fn apply_to(self, data: &mut FormData) {
        let patch = self;
        merge_fields!(
            data, patch,
            focus_keyword, meta_title, meta_description, tags, niche, seo_level, tone,
            article_size, elements, advanced, generated_titles, generated_descriptions,
            generated_tags, generated_article, generated_prompt, schema_markup, api_settings,
        );
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    data: FormData,
    version: String,
    last_updated: DateTime<Utc>,
}

/// Owns the live [`FormData`] and mirrors it into a [`PersistenceService`].
pub struct FormStore {
    storage: Arc<dyn PersistenceService>,
    key: String,
    data: FormData,
}

impl FormStore {
    /// Create the store and rehydrate from storage.
    pub fn open(storage: Arc<dyn PersistenceService>, key: impl Into<String>) -> Result<Self> {
        let mut store = Self { storage, key: key.into(), data: FormData::default() };
        store.load()?;
        Ok(store)
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Merge `patch` and write it through. On a storage error the in-memory
    /// record is left as it was.
    pub fn update(&mut self, patch: FormPatch) -> Result<&FormData> {
        let mut next = self.data.clone();
        patch.apply_to(&mut next);
        self.persist(&next)?;
        self.data = next;
        Ok(&self.data)
    }

    pub fn load(&mut self) -> Result<&FormData> {
        let raw = match self.storage.get(&self.key)? {
            Some(raw) => raw,
            None => {
                self.data = FormData::default();
                return Ok(&self.data);
            }
        };

        match decode(&raw) {
            Ok(data) => self.data = data,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "discarding corrupt form data");
                self.storage.remove(&self.key)?;
                self.data = FormData::default();
            }
        }
        Ok(&self.data)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.storage.remove(&self.key)?;
        self.data = FormData::default();
        Ok(())
    }

    fn persist(&self, data: &FormData) -> Result<()> {
        let envelope = Envelope {
            data: data.clone(),
            version: CURRENT_SCHEMA_VERSION.into(),
            last_updated: Utc::now(),
        };
        let text = serde_json::to_string(&envelope).map_err(|e| WizardError::Storage(e.to_string()))?;
        self.storage.set(&self.key, &text)
    }
}

fn decode(raw: &str) -> Result<FormData> {
    let value: Value = serde_json::from_str(raw).map_err(|e| WizardError::Parse(e.to_string()))?;
    let Value::Object(mut envelope) = value else {
        return Err(WizardError::Parse("form data envelope is not an object".into()));
    };

    let version = envelope
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or("1")
        .to_string();
    let mut data = match envelope.remove("data") {
        Some(Value::Object(map)) => map,
        _ => return Err(WizardError::Parse("form data envelope has no data object".into())),
    };

    if version != CURRENT_SCHEMA_VERSION {
        tracing::warn!(stored = %version, current = CURRENT_SCHEMA_VERSION, "form data schema version mismatch");
        if !migrate::run(&version, &mut data) {
            tracing::warn!(stored = %version, "no migration path; decoding best-effort");
        }
    }

    let mut form: FormData = serde_json::from_value(Value::Object(data))
        .map_err(|e| WizardError::Parse(e.to_string()))?;
    form.schema_version = CURRENT_SCHEMA_VERSION.into();
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    const KEY: &str = "contentgen.article.formData";

    fn store() -> (Arc<MemoryStore>, FormStore) {
        let mem = Arc::new(MemoryStore::new());
        let form = FormStore::open(mem.clone(), KEY).unwrap();
        (mem, form)
    }

    #[test]
    fn fresh_store_starts_with_defaults() {
        let (_, form) = store();
        assert_eq!(form.data(), &FormData::default());
    }

    #[test]
    fn update_then_reload_round_trips() {
        let (mem, mut form) = store();
        form.update(FormPatch {
            focus_keyword: Some("vegan pasta".into()),
            niche: Some(Niche::Recipes),
            generated_titles: Some(vec!["A".into(), "B".into()]),
            ..Default::default()
        })
        .unwrap();
        form.update(FormPatch { focus_keyword: Some("vegan lasagna".into()), ..Default::default() })
            .unwrap();

        let reloaded = FormStore::open(mem, KEY).unwrap();
        assert_eq!(reloaded.data().focus_keyword, "vegan lasagna");
        assert_eq!(reloaded.data().niche, Niche::Recipes);
        assert_eq!(reloaded.data().generated_titles, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn update_is_a_shallow_merge() {
        let (_, mut form) = store();
        form.update(FormPatch { meta_title: Some("T".into()), ..Default::default() }).unwrap();
        form.update(FormPatch { meta_description: Some("D".into()), ..Default::default() }).unwrap();
        assert_eq!(form.data().meta_title, "T");
        assert_eq!(form.data().meta_description, "D");
    }

    #[test]
    fn api_settings_can_be_cleared() {
        let (_, mut form) = store();
        form.update(FormPatch {
            api_settings: Some(Some(ApiSettings {
                provider: crate::cli::ProviderKind::Claude,
                model: "claude-3-5-sonnet-latest".into(),
            })),
            ..Default::default()
        })
        .unwrap();
        assert!(form.data().api_settings.is_some());
        form.update(FormPatch { api_settings: Some(None), ..Default::default() }).unwrap();
        assert!(form.data().api_settings.is_none());
    }

    #[test]
    fn corrupt_entry_is_removed_and_defaults_used() {
        let mem = Arc::new(MemoryStore::new());
        mem.set(KEY, "{not json").unwrap();
        let form = FormStore::open(mem.clone(), KEY).unwrap();
        assert_eq!(form.data(), &FormData::default());
        assert_eq!(mem.get(KEY).unwrap(), None);
    }

    #[test]
    fn envelope_carries_version_and_timestamp() {
        let (mem, mut form) = store();
        form.update(FormPatch { tags: Some("a, b".into()), ..Default::default() }).unwrap();
        let raw: Value = serde_json::from_str(&mem.get(KEY).unwrap().unwrap()).unwrap();
        assert_eq!(raw["version"], CURRENT_SCHEMA_VERSION);
        assert!(raw["lastUpdated"].as_str().is_some());
        assert_eq!(raw["data"]["tags"], "a, b");
    }

    #[test]
    fn version_one_entry_is_migrated() {
        let mem = Arc::new(MemoryStore::new());
        let legacy = serde_json::json!({
            "version": "1",
            "lastUpdated": "2024-01-01T00:00:00Z",
            "data": { "keyword": "sourdough", "tags": ["bread", "baking"], "niche": "recipes" }
        });
        mem.set(KEY, &legacy.to_string()).unwrap();
        let form = FormStore::open(mem, KEY).unwrap();
        assert_eq!(form.data().focus_keyword, "sourdough");
        assert_eq!(form.data().tags, "bread, baking");
        assert_eq!(form.data().niche, Niche::Recipes);
    }

    #[test]
    fn reset_clears_storage() {
        let (mem, mut form) = store();
        form.update(FormPatch { focus_keyword: Some("x".into()), ..Default::default() }).unwrap();
        form.reset().unwrap();
        assert_eq!(mem.get(KEY).unwrap(), None);
        assert!(form.data().focus_keyword.is_empty());
    }

    struct ReadOnlyStore(MemoryStore);

    impl PersistenceService for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(WizardError::Storage("disk full".into()))
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.0.remove(key)
        }
    }

    #[test]
    fn failed_write_keeps_previous_data() {
        let mut form = FormStore::open(Arc::new(ReadOnlyStore(MemoryStore::new())), KEY).unwrap();
        let err = form
            .update(FormPatch { focus_keyword: Some("lost".into()), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, WizardError::Storage(_)));
        assert_eq!(form.data(), &FormData::default());
    }
}
