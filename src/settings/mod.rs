use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::errors::{Result, WizardError};
use crate::form::ApiSettings;
use crate::provider::ProviderConfig;
use crate::storage::PersistenceService;
use crate::wizard::StepId;

const PREFERRED_KEY: &str = "contentgen.preferredProvider";
const CUSTOM_KEY: &str = "contentgen.customApi";

fn step_key(step: StepId) -> String {
    format!("contentgen.stepProvider.{step}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomApi {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub verify_ssl: bool,
}

impl Default for CustomApi {
    fn default() -> Self {
        Self { endpoint: String::new(), api_key: String::new(), model: String::new(), verify_ssl: true }
    }
}

/// Provider preferences persisted next to the form data.
pub struct ProviderSettings {
    storage: Arc<dyn PersistenceService>,
}

impl ProviderSettings {
    pub fn new(storage: Arc<dyn PersistenceService>) -> Self {
        Self { storage }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.storage.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                tracing::warn!(key, error = %e, "dropping unreadable setting");
                self.storage.remove(key)?;
                Ok(None)
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|e| WizardError::Storage(e.to_string()))?;
        self.storage.set(key, &raw)
    }

    pub fn preferred(&self) -> Result<Option<ApiSettings>> {
        self.read(PREFERRED_KEY)
    }

    pub fn set_preferred(&self, settings: &ApiSettings) -> Result<()> {
        self.write(PREFERRED_KEY, settings)
    }

    pub fn step_override(&self, step: StepId) -> Result<Option<ApiSettings>> {
        self.read(&step_key(step))
    }

    pub fn set_step_override(&self, step: StepId, settings: Option<&ApiSettings>) -> Result<()> {
        match settings {
            Some(s) => self.write(&step_key(step), s),
            None => self.storage.remove(&step_key(step)),
        }
    }

    pub fn custom(&self) -> Result<Option<CustomApi>> {
        self.read(CUSTOM_KEY)
    }

    pub fn set_custom(&self, custom: &CustomApi) -> Result<()> {
        self.write(CUSTOM_KEY, custom)
    }

    /// Provider and model for `step`: per-step override, then the form's own
    /// choice, then the stored preference, then the config default.
    pub fn resolve(&self, step: StepId, form: Option<&ApiSettings>, cfg: &Config) -> Result<ApiSettings> {
        if let Some(s) = self.step_override(step)? {
            return Ok(s);
        }
        if let Some(s) = form {
            return Ok(s.clone());
        }
        if let Some(s) = self.preferred()? {
            return Ok(s);
        }
        Ok(ApiSettings { provider: cfg.provider, model: cfg.model.clone() })
    }

    /// Attach credentials and endpoint to a provider choice.
    pub fn provider_config(&self, choice: &ApiSettings) -> Result<ProviderConfig> {
        if choice.provider == ProviderKind::Custom {
            let custom = self.custom()?.ok_or_else(|| {
                WizardError::MissingInput("custom provider selected but no custom API settings stored".into())
            })?;
            let model = if choice.model.trim().is_empty() { custom.model.clone() } else { choice.model.clone() };
            let mut cfg = ProviderConfig::new(ProviderKind::Custom, model, custom.api_key.clone())
                .with_endpoint(custom.endpoint.clone());
            cfg.verify_ssl = custom.verify_ssl;
            return Ok(cfg);
        }

        let var = choice.provider.key_env().unwrap_or_default();
        let key = std::env::var(var).unwrap_or_default();
        if key.trim().is_empty() {
            return Err(WizardError::MissingInput(format!("{var} is not set")));
        }
        Ok(ProviderConfig::new(choice.provider, choice.model.clone(), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn settings() -> (Arc<MemoryStore>, ProviderSettings) {
        let mem = Arc::new(MemoryStore::new());
        (mem.clone(), ProviderSettings::new(mem))
    }

    fn choice(p: ProviderKind) -> ApiSettings {
        ApiSettings { provider: p, model: p.default_model().into() }
    }

    #[test]
    fn resolve_falls_back_to_config() {
        let (_, s) = settings();
        let cfg = Config::default();
        let got = s.resolve(StepId::Title, None, &cfg).unwrap();
        assert_eq!(got.provider, cfg.provider);
        assert_eq!(got.model, cfg.model);
    }

    #[test]
    fn step_override_beats_preference() {
        let (_, s) = settings();
        s.set_preferred(&choice(ProviderKind::Gemini)).unwrap();
        s.set_step_override(StepId::Article, Some(&choice(ProviderKind::Claude))).unwrap();
        let cfg = Config::default();
        assert_eq!(s.resolve(StepId::Article, None, &cfg).unwrap().provider, ProviderKind::Claude);
        assert_eq!(s.resolve(StepId::Title, None, &cfg).unwrap().provider, ProviderKind::Gemini);

        s.set_step_override(StepId::Article, None).unwrap();
        assert_eq!(s.resolve(StepId::Article, None, &cfg).unwrap().provider, ProviderKind::Gemini);
    }

    #[test]
    fn form_choice_beats_preference() {
        let (_, s) = settings();
        s.set_preferred(&choice(ProviderKind::Gemini)).unwrap();
        let form = choice(ProviderKind::DeepSeek);
        let got = s.resolve(StepId::Title, Some(&form), &Config::default()).unwrap();
        assert_eq!(got.provider, ProviderKind::DeepSeek);
    }

    #[test]
    fn custom_provider_uses_stored_endpoint() {
        let (_, s) = settings();
        s.set_custom(&CustomApi {
            endpoint: "https://llm.local/v1/chat/completions".into(),
            api_key: "secret".into(),
            model: "mistral".into(),
            verify_ssl: false,
        })
        .unwrap();
        let cfg = s
            .provider_config(&ApiSettings { provider: ProviderKind::Custom, model: String::new() })
            .unwrap();
        assert_eq!(cfg.model, "mistral");
        assert_eq!(cfg.endpoint(), "https://llm.local/v1/chat/completions");
        assert!(!cfg.verify_ssl);
    }

    #[test]
    fn custom_without_settings_is_missing_input() {
        let (_, s) = settings();
        let err = s
            .provider_config(&ApiSettings { provider: ProviderKind::Custom, model: "m".into() })
            .unwrap_err();
        assert!(matches!(err, WizardError::MissingInput(_)));
    }

    #[test]
    fn unreadable_setting_is_dropped() {
        let (mem, s) = settings();
        mem.set(PREFERRED_KEY, "{{").unwrap();
        assert_eq!(s.preferred().unwrap(), None);
        assert_eq!(mem.get(PREFERRED_KEY).unwrap(), None);
    }
}
