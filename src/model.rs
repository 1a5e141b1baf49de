use html_escape::decode_html_entities;
use serde::{Deserialize, Serialize};

/// A recipe record as returned by the API.
///
/// Both the list endpoints and the per-id information endpoint produce this
/// shape; the information endpoint simply fills in more of the optional
/// fields. Anything the API leaves out stays `None` and renders as a
/// placeholder rather than failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    /// HTML-bearing description text
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub vegetarian: Option<bool>,
    #[serde(default)]
    pub vegan: Option<bool>,
    #[serde(default)]
    pub gluten_free: Option<bool>,
    #[serde(default)]
    pub dairy_free: Option<bool>,
    /// Ingredient-mode only: how many requested ingredients the recipe uses
    #[serde(default)]
    pub used_ingredient_count: Option<u32>,
    /// Ingredient-mode only: how many extra ingredients are needed
    #[serde(default)]
    pub missed_ingredient_count: Option<u32>,
}

impl Recipe {
    /// Public recipe page for this record, templated from title and id.
    pub fn source_link(&self) -> String {
        format!("https://spoonacular.com/recipes/{}-{}", slugify(&self.title), self.id)
    }
}

/// Overlay a detail record onto the summary it was fetched for.
///
/// Field precedence is detail-wins: any field the detail record carries
/// replaces the summary's value, anything it lacks falls back to the summary.
/// The id always comes from the summary, which is what the detail fetch was
/// keyed on in the first place.
pub fn overlay(summary: Recipe, detail: Recipe) -> Recipe {
    Recipe {
        id: summary.id,
        title: if detail.title.is_empty() { summary.title } else { detail.title },
        image: detail.image.or(summary.image),
        ready_in_minutes: detail.ready_in_minutes.or(summary.ready_in_minutes),
        servings: detail.servings.or(summary.servings),
        summary: detail.summary.or(summary.summary),
        source_url: detail.source_url.or(summary.source_url),
        vegetarian: detail.vegetarian.or(summary.vegetarian),
        vegan: detail.vegan.or(summary.vegan),
        gluten_free: detail.gluten_free.or(summary.gluten_free),
        dairy_free: detail.dairy_free.or(summary.dairy_free),
        used_ingredient_count: detail.used_ingredient_count.or(summary.used_ingredient_count),
        missed_ingredient_count: detail
            .missed_ingredient_count
            .or(summary.missed_ingredient_count),
    }
}

/// Body of a direct-search response: the records live under `results`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Recipe>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

fn slugify(title: &str) -> String {
    let decoded = decode_html_entities(title);
    let mut slug = String::with_capacity(decoded.len());
    for c in decoded.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if (c.is_whitespace() || c == '-') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_detail_wins() {
        let summary = Recipe {
            id: 7,
            title: "Pasta".to_string(),
            image: Some("summary.jpg".to_string()),
            servings: Some(2),
            ..Default::default()
        };
        let detail = Recipe {
            id: 7,
            title: "Pasta Carbonara".to_string(),
            servings: Some(4),
            summary: Some("<b>Rich</b> and creamy.".to_string()),
            ..Default::default()
        };

        let merged = overlay(summary, detail);
        assert_eq!(merged.title, "Pasta Carbonara");
        assert_eq!(merged.servings, Some(4));
        assert_eq!(merged.image, Some("summary.jpg".to_string()));
        assert_eq!(merged.summary, Some("<b>Rich</b> and creamy.".to_string()));
    }

    #[test]
    fn test_overlay_keeps_summary_when_detail_is_sparse() {
        let summary = Recipe {
            id: 1,
            title: "Soup".to_string(),
            ready_in_minutes: Some(25),
            ..Default::default()
        };
        let merged = overlay(summary.clone(), Recipe { id: 1, ..Default::default() });
        assert_eq!(merged, summary);
    }

    #[test]
    fn test_source_link_slug() {
        let recipe = Recipe {
            id: 715538,
            title: "Bruschetta Style Pork &amp; Pasta".to_string(),
            ..Default::default()
        };
        assert_eq!(
            recipe.source_link(),
            "https://spoonacular.com/recipes/bruschetta-style-pork-pasta-715538"
        );
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let recipe: Recipe = serde_json::from_str(r#"{"id": 3, "title": "Toast"}"#).unwrap();
        assert_eq!(recipe.servings, None);
        assert_eq!(recipe.image, None);
        assert_eq!(recipe.vegetarian, None);
    }
}
