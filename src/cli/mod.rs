use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(name = "openai", alias = "open-ai", alias = "chatgpt")]
    OpenAI,
    #[value(alias = "anthropic")]
    Claude,
    #[value(alias = "google")]
    Gemini,
    Perplexity,
    #[value(name = "deepseek")]
    DeepSeek,
    Custom,
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-4o-mini",
            ProviderKind::Claude => "claude-3-5-sonnet-latest",
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::Perplexity => "sonar",
            ProviderKind::DeepSeek => "deepseek-chat",
            ProviderKind::Custom => "",
        }
    }

    /// Environment variable holding the API key. Custom endpoints keep
    /// their key in the stored custom settings instead.
    pub fn key_env(self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAI => Some("OPENAI_API_KEY"),
            ProviderKind::Claude => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Gemini => Some("GEMINI_API_KEY"),
            ProviderKind::Perplexity => Some("PERPLEXITY_API_KEY"),
            ProviderKind::DeepSeek => Some("DEEPSEEK_API_KEY"),
            ProviderKind::Custom => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Claude => "claude",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Perplexity => "perplexity",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowArg {
    Article,
    Blog,
    Prompt,
}

#[derive(Parser, Debug)]
#[command(name = "contentgen", version, about = "Step-by-step SEO content generator backed by LLM providers")]
pub struct Args {
    #[arg(long, default_value = ".")]
    pub root: String,

    /// TOML config file; flags below override it.
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub save_prompts: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the interactive wizard.
    Wizard {
        #[arg(long, value_enum, default_value_t = FlowArg::Article)]
        flow: FlowArg,
    },
    /// Show or change the stored provider preferences.
    Providers {
        /// Make this the preferred provider.
        #[arg(long, value_enum)]
        set: Option<ProviderKind>,
        #[arg(long)]
        model: Option<String>,
        /// Store a custom OpenAI-compatible endpoint.
        #[arg(long)]
        custom_endpoint: Option<String>,
        #[arg(long)]
        custom_key: Option<String>,
        #[arg(long)]
        custom_model: Option<String>,
        #[arg(long)]
        insecure: bool,
    },
    /// Print the JSON-LD schema markup for the stored form data.
    Schema {
        #[arg(long, value_enum, default_value_t = FlowArg::Article)]
        flow: FlowArg,
    },
    /// Forget the stored form data of a flow.
    Reset {
        #[arg(long, value_enum, default_value_t = FlowArg::Article)]
        flow: FlowArg,
    },
}
