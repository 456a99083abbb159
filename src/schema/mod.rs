use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{Result, WizardError};
use crate::form::{FormData, Niche};

/// Values for schema.org fields the wizard never collects. The defaults are
/// demo placeholders; set real values in the `[schema]` config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaPlaceholders {
    pub author_name: String,
    pub publisher_name: String,
    pub publisher_logo: String,
    pub image_url: String,
    pub calories: String,
    pub prep_time: String,
    pub cook_time: String,
    pub recipe_yield: String,
    pub recipe_ingredients: Vec<String>,
    pub recipe_instructions: Vec<String>,
}

impl Default for SchemaPlaceholders {
    fn default() -> Self {
        Self {
            author_name: "Author Name".into(),
            publisher_name: "Publisher Name".into(),
            publisher_logo: "https://example.com/logo.png".into(),
            image_url: "https://example.com/image.jpg".into(),
            calories: "250 calories".into(),
            prep_time: "PT15M".into(),
            cook_time: "PT30M".into(),
            recipe_yield: "4 servings".into(),
            recipe_ingredients: vec!["Ingredient 1".into(), "Ingredient 2".into()],
            recipe_instructions: vec!["Step 1".into(), "Step 2".into()],
        }
    }
}

impl SchemaPlaceholders {
    /// Config names of the fields the markup for `niche` emits that still
    /// hold their demo value.
    pub fn defaults_in_use(&self, niche: Niche) -> Vec<&'static str> {
        let d = Self::default();
        let fields: &[(&'static str, bool)] = &[
            ("author_name", self.author_name == d.author_name),
            ("publisher_name", self.publisher_name == d.publisher_name),
            ("publisher_logo", self.publisher_logo == d.publisher_logo),
            ("image_url", self.image_url == d.image_url),
            ("calories", self.calories == d.calories),
            ("prep_time", self.prep_time == d.prep_time),
            ("cook_time", self.cook_time == d.cook_time),
            ("recipe_yield", self.recipe_yield == d.recipe_yield),
            ("recipe_ingredients", self.recipe_ingredients == d.recipe_ingredients),
            ("recipe_instructions", self.recipe_instructions == d.recipe_instructions),
        ];
        let emitted = emitted_fields(niche);
        fields
            .iter()
            .filter(|(name, is_default)| *is_default && emitted.contains(name))
            .map(|(name, _)| *name)
            .collect()
    }
}

fn emitted_fields(niche: Niche) -> &'static [&'static str] {
    match niche {
        Niche::Recipes => &[
            "author_name",
            "image_url",
            "calories",
            "prep_time",
            "cook_time",
            "recipe_yield",
            "recipe_ingredients",
            "recipe_instructions",
        ],
        Niche::Health | Niche::Fitness => &["author_name", "publisher_name", "publisher_logo"],
        Niche::Education => &["publisher_name"],
        _ => &["author_name", "publisher_name", "publisher_logo", "image_url"],
    }
}

/// schema.org type chosen for a niche.
pub fn schema_type(niche: Niche) -> &'static str {
    match niche {
        Niche::Recipes => "Recipe",
        Niche::Technology => "TechArticle",
        Niche::Health | Niche::Fitness => "MedicalWebPage",
        Niche::Education => "Course",
        _ => "Article",
    }
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build pretty-printed JSON-LD markup for the given content.
pub fn schema_markup(
    niche: Niche,
    title: &str,
    description: &str,
    tags: &str,
    placeholders: &SchemaPlaceholders,
) -> Result<String> {
    for field in placeholders.defaults_in_use(niche) {
        tracing::warn!(field, "schema markup uses a placeholder value; set it under [schema] in the config");
    }

    let keywords = split_tags(tags).join(", ");
    let author = json!({ "@type": "Person", "name": placeholders.author_name });
    let publisher = json!({
        "@type": "Organization",
        "name": placeholders.publisher_name,
        "logo": { "@type": "ImageObject", "url": placeholders.publisher_logo },
    });

    let value: Value = match niche {
        Niche::Recipes => json!({
            "@context": "https://schema.org",
            "@type": "Recipe",
            "name": title,
            "description": description,
            "image": placeholders.image_url,
            "author": author,
            "keywords": keywords,
            "prepTime": placeholders.prep_time,
            "cookTime": placeholders.cook_time,
            "recipeYield": placeholders.recipe_yield,
            "recipeCategory": "Main Course",
            "nutrition": { "@type": "NutritionInformation", "calories": placeholders.calories },
            "recipeIngredient": placeholders.recipe_ingredients,
            "recipeInstructions": placeholders
                .recipe_instructions
                .iter()
                .map(|text| json!({ "@type": "HowToStep", "text": text }))
                .collect::<Vec<_>>(),
        }),
        Niche::Technology => json!({
            "@context": "https://schema.org",
            "@type": "TechArticle",
            "headline": title,
            "description": description,
            "image": placeholders.image_url,
            "author": author,
            "publisher": publisher,
            "keywords": keywords,
            "proficiencyLevel": "Beginner",
        }),
        Niche::Health | Niche::Fitness => json!({
            "@context": "https://schema.org",
            "@type": "MedicalWebPage",
            "name": title,
            "description": description,
            "author": author,
            "publisher": publisher,
            "keywords": keywords,
            "lastReviewed": "",
            "reviewedBy": { "@type": "Person", "name": placeholders.author_name },
        }),
        Niche::Education => json!({
            "@context": "https://schema.org",
            "@type": "Course",
            "name": title,
            "description": description,
            "keywords": keywords,
            "provider": {
                "@type": "Organization",
                "name": placeholders.publisher_name,
            },
        }),
        _ => json!({
            "@context": "https://schema.org",
            "@type": "Article",
            "headline": title,
            "description": description,
            "image": placeholders.image_url,
            "author": author,
            "publisher": publisher,
            "keywords": keywords,
        }),
    };

    serde_json::to_string_pretty(&value).map_err(|e| WizardError::Parse(e.to_string()))
}

/// Schema markup for the current form data.
pub fn for_form(data: &FormData, placeholders: &SchemaPlaceholders) -> Result<String> {
    schema_markup(data.niche, &data.meta_title, &data.meta_description, &data.tags, placeholders)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_of(markup: &str) -> String {
        let v: Value = serde_json::from_str(markup).unwrap();
        v["@type"].as_str().unwrap().to_string()
    }

    #[test]
    fn recipes_produce_recipe_type() {
        let out = schema_markup(Niche::Recipes, "Vegan Pasta", "Quick dinner", "vegan, pasta", &SchemaPlaceholders::default()).unwrap();
        assert_eq!(type_of(&out), "Recipe");
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["keywords"], "vegan, pasta");
        assert_eq!(v["nutrition"]["calories"], "250 calories");
    }

    #[test]
    fn technology_produces_tech_article() {
        let out = schema_markup(Niche::Technology, "Rust 2024", "What changed", "", &SchemaPlaceholders::default()).unwrap();
        assert_eq!(type_of(&out), "TechArticle");
    }

    #[test]
    fn other_niches_map_to_their_shapes() {
        let p = SchemaPlaceholders::default();
        assert_eq!(type_of(&schema_markup(Niche::Health, "t", "d", "", &p).unwrap()), "MedicalWebPage");
        assert_eq!(type_of(&schema_markup(Niche::Education, "t", "d", "", &p).unwrap()), "Course");
        assert_eq!(type_of(&schema_markup(Niche::Travel, "t", "d", "", &p).unwrap()), "Article");
    }

    #[test]
    fn configured_values_replace_placeholders() {
        let p = SchemaPlaceholders { author_name: "Jane Doe".into(), ..Default::default() };
        let out = schema_markup(Niche::Finance, "t", "d", " a ,b,, ", &p).unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["author"]["name"], "Jane Doe");
        assert_eq!(v["keywords"], "a, b");
    }

    #[test]
    fn every_emitted_default_is_reported() {
        let p = SchemaPlaceholders {
            author_name: "Jane Doe".into(),
            publisher_name: "Acme".into(),
            publisher_logo: "https://acme.test/logo.png".into(),
            ..Default::default()
        };
        assert_eq!(
            p.defaults_in_use(Niche::Recipes),
            vec![
                "image_url",
                "calories",
                "prep_time",
                "cook_time",
                "recipe_yield",
                "recipe_ingredients",
                "recipe_instructions"
            ]
        );
        assert_eq!(p.defaults_in_use(Niche::Finance), vec!["image_url"]);
        assert!(p.defaults_in_use(Niche::Education).is_empty());
    }

    #[test]
    fn recipe_lists_come_from_placeholders() {
        let p = SchemaPlaceholders {
            recipe_ingredients: vec!["200g penne".into()],
            recipe_instructions: vec!["Boil the pasta".into()],
            ..Default::default()
        };
        let out = schema_markup(Niche::Recipes, "t", "d", "", &p).unwrap();
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["recipeIngredient"], json!(["200g penne"]));
        assert_eq!(v["recipeInstructions"][0]["text"], "Boil the pasta");
        assert!(!p.defaults_in_use(Niche::Recipes).contains(&"recipe_ingredients"));
    }

    #[test]
    fn output_is_pretty_printed() {
        let out = schema_markup(Niche::General, "t", "d", "", &SchemaPlaceholders::default()).unwrap();
        assert!(out.contains("\n  \"@context\""));
    }
}
