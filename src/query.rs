use crate::error::SearchError;

/// Which list endpoint a query targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Free-text search
    Text(String),
    /// Comma-separated ingredient list, forwarded to the API as-is
    Ingredients(String),
}

/// A validated search query plus its filter and paging parameters.
///
/// Building one is a pure transform: nothing here touches the network. The
/// only rejected input is an empty or whitespace-only primary string, which
/// guarantees an empty query can never turn into a request downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeQuery {
    pub kind: QueryKind,
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
    /// Ingredient mode: fetch the full record for each listed item
    pub want_details: bool,
}

impl RecipeQuery {
    /// Free-text query. Fails on blank input.
    pub fn direct(text: &str) -> Result<Self, SearchError> {
        if text.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self::new(QueryKind::Text(text.trim().to_string())))
    }

    /// Ingredient-list query. The list is not parsed or validated beyond the
    /// blank check; the API accepts the raw comma-separated string.
    pub fn by_ingredients(raw: &str) -> Result<Self, SearchError> {
        if raw.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self::new(QueryKind::Ingredients(raw.to_string())))
    }

    fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            diet: None,
            cuisine: None,
            meal_type: None,
            page: 1,
            per_page: 10,
            want_details: true,
        }
    }

    pub fn with_diet(mut self, diet: impl Into<String>) -> Self {
        self.diet = Some(diet.into());
        self
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn with_meal_type(mut self, meal_type: impl Into<String>) -> Self {
        self.meal_type = Some(meal_type.into());
        self
    }

    /// Select a 1-based page; 0 is treated as page 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn with_details(mut self, want_details: bool) -> Self {
        self.want_details = want_details;
        self
    }

    /// The primary input string, whichever kind this is.
    pub fn text(&self) -> &str {
        match &self.kind {
            QueryKind::Text(text) => text,
            QueryKind::Ingredients(raw) => raw,
        }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.per_page
    }

    /// Outbound query parameters for the list endpoint.
    ///
    /// The API key is appended by the client, not here.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = match &self.kind {
            QueryKind::Text(text) => vec![
                ("query", text.clone()),
                ("addRecipeInformation", "true".to_string()),
            ],
            QueryKind::Ingredients(raw) => vec![
                ("ingredients", raw.clone()),
                ("sort", "min-missing-ingredients".to_string()),
            ],
        };
        pairs.push(("number", self.per_page.to_string()));
        pairs.push(("offset", self.offset().to_string()));
        if let Some(diet) = &self.diet {
            pairs.push(("diet", diet.clone()));
        }
        if let Some(cuisine) = &self.cuisine {
            pairs.push(("cuisine", cuisine.clone()));
        }
        if let Some(meal_type) = &self.meal_type {
            pairs.push(("type", meal_type.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_rejected() {
        assert!(matches!(RecipeQuery::direct(""), Err(SearchError::EmptyQuery)));
        assert!(matches!(RecipeQuery::direct("   "), Err(SearchError::EmptyQuery)));
        assert!(matches!(
            RecipeQuery::by_ingredients("\t \n"),
            Err(SearchError::EmptyQuery)
        ));
    }

    #[test]
    fn test_offset_math() {
        let query = RecipeQuery::direct("chicken").unwrap().with_page(3);
        assert_eq!(query.offset(), 20);

        let query = RecipeQuery::direct("chicken").unwrap().with_page(0);
        assert_eq!(query.page, 1);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_direct_query_pairs() {
        let query = RecipeQuery::direct("chicken soup")
            .unwrap()
            .with_diet("vegetarian")
            .with_meal_type("main course")
            .with_page(2);
        let pairs = query.query_pairs();

        assert!(pairs.contains(&("query", "chicken soup".to_string())));
        assert!(pairs.contains(&("addRecipeInformation", "true".to_string())));
        assert!(pairs.contains(&("number", "10".to_string())));
        assert!(pairs.contains(&("offset", "10".to_string())));
        assert!(pairs.contains(&("diet", "vegetarian".to_string())));
        assert!(pairs.contains(&("type", "main course".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "cuisine"));
    }

    #[test]
    fn test_ingredient_list_is_forwarded_as_is() {
        let query = RecipeQuery::by_ingredients("tomato, aged cheddar,basil").unwrap();
        let pairs = query.query_pairs();
        assert!(pairs.contains(&("ingredients", "tomato, aged cheddar,basil".to_string())));
        assert!(pairs.contains(&("sort", "min-missing-ingredients".to_string())));
    }
}
