use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cli::ProviderKind;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Niche {
    #[default]
    General,
    Recipes,
    Technology,
    Health,
    Finance,
    Travel,
    Fitness,
    Fashion,
    Education,
    RealEstate,
    Automotive,
}

impl Niche {
    pub fn label(self) -> &'static str {
        match self {
            Niche::General => "General",
            Niche::Recipes => "Recipes & Cooking",
            Niche::Technology => "Technology",
            Niche::Health => "Health & Wellness",
            Niche::Finance => "Personal Finance",
            Niche::Travel => "Travel",
            Niche::Fitness => "Fitness",
            Niche::Fashion => "Fashion & Beauty",
            Niche::Education => "Education",
            Niche::RealEstate => "Real Estate",
            Niche::Automotive => "Automotive",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeoLevel {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Friendly,
    Authoritative,
    Conversational,
    Humorous,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Friendly => "friendly",
            Tone::Authoritative => "authoritative",
            Tone::Conversational => "conversational",
            Tone::Humorous => "humorous",
        };
        f.write_str(s)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ArticleSize {
    pub fn word_target(self) -> u32 {
        match self {
            ArticleSize::Small => 800,
            ArticleSize::Medium => 1500,
            ArticleSize::Large => 2500,
        }
    }
}

/// Optional formatting elements requested in the article body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Elements {
    pub bold: bool,
    pub h3: bool,
    pub lists: bool,
    pub tables: bool,
    pub internal_links: bool,
    pub external_links: bool,
    pub faq: bool,
    pub key_takeaways: bool,
}

impl Default for Elements {
    fn default() -> Self {
        Self {
            bold: true,
            h3: true,
            lists: true,
            tables: false,
            internal_links: false,
            external_links: false,
            faq: false,
            key_takeaways: false,
        }
    }
}

impl Elements {
    /// Flip one element by its CLI name; returns the new value.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let slot = match name.to_ascii_lowercase().as_str() {
            "bold" => &mut self.bold,
            "h3" => &mut self.h3,
            "lists" => &mut self.lists,
            "tables" => &mut self.tables,
            "internal-links" | "internallinks" => &mut self.internal_links,
            "external-links" | "externallinks" => &mut self.external_links,
            "faq" | "faqs" => &mut self.faq,
            "key-takeaways" | "keytakeaways" => &mut self.key_takeaways,
            _ => return None,
        };
        *slot = !*slot;
        Some(*slot)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedSettings {
    pub enabled: bool,
    pub internal_link_url: String,
    pub external_link_url: String,
    pub custom_instructions: String,
}

impl AdvancedSettings {
    pub fn has_links(&self) -> bool {
        !self.internal_link_url.trim().is_empty() && !self.external_link_url.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    pub provider: ProviderKind,
    pub model: String,
}

/// Names of the fields a wizard step may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FocusKeyword,
    MetaTitle,
    MetaDescription,
    Tags,
    GeneratedArticle,
    GeneratedPrompt,
    SchemaMarkup,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::FocusKeyword => "focusKeyword",
            Field::MetaTitle => "metaTitle",
            Field::MetaDescription => "metaDescription",
            Field::Tags => "tags",
            Field::GeneratedArticle => "generatedArticle",
            Field::GeneratedPrompt => "generatedPrompt",
            Field::SchemaMarkup => "schemaMarkup",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
