use anyhow::Context;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Args, ProviderKind};
use crate::schema::SchemaPlaceholders;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub root: String,
    pub provider: ProviderKind,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: MaxTokens,
    pub save_prompts: bool,
    pub schema: SchemaPlaceholders,
}

/// Output budget per generation kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxTokens {
    pub titles: u32,
    pub descriptions: u32,
    pub tags: u32,
    pub article: u32,
}

impl Default for MaxTokens {
    fn default() -> Self {
        Self { titles: 500, descriptions: 1000, tags: 200, article: 4096 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: ".".into(),
            provider: ProviderKind::OpenAI,
            model: ProviderKind::OpenAI.default_model().into(),
            timeout_secs: 120,
            max_tokens: MaxTokens::default(),
            save_prompts: false,
            schema: SchemaPlaceholders::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Config file (if any) first, then CLI flags on top.
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::load(Path::new(p))?,
            None => Self::default(),
        };
        cfg.root = args.root.clone();
        if let Some(p) = args.provider {
            cfg.provider = p;
            if args.model.is_none() {
                cfg.model = p.default_model().into();
            }
        }
        if let Some(m) = &args.model {
            cfg.model = m.clone();
        }
        if let Some(t) = args.timeout_secs {
            cfg.timeout_secs = t;
        }
        cfg.save_prompts |= args.save_prompts;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
provider = "gemini"
model = "gemini-1.5-pro"

[schema]
author_name = "Jane Doe"
"#,
        )
        .unwrap();
        assert_eq!(cfg.provider, ProviderKind::Gemini);
        assert_eq!(cfg.model, "gemini-1.5-pro");
        assert_eq!(cfg.timeout_secs, 120);
        assert_eq!(cfg.schema.author_name, "Jane Doe");
        assert_eq!(cfg.schema.publisher_name, SchemaPlaceholders::default().publisher_name);
    }

    #[test]
    fn flags_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contentgen.toml");
        std::fs::write(&path, "provider = \"claude\"\ntimeout_secs = 30\n").unwrap();
        let args = Args::try_parse_from([
            "contentgen",
            "--config",
            path.to_str().unwrap(),
            "--provider",
            "deepseek",
            "wizard",
        ])
        .unwrap();
        let cfg = Config::from_args(&args).unwrap();
        assert_eq!(cfg.provider, ProviderKind::DeepSeek);
        assert_eq!(cfg.model, "deepseek-chat");
        assert_eq!(cfg.timeout_secs, 30);
    }
}
