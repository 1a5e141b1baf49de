use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::SearchError;
use crate::model::{Recipe, SearchResponse};
use crate::query::RecipeQuery;

/// HTTP client for the recipe API.
///
/// One shared `reqwest::Client` behind a cheap clone; the configuration is
/// injected at construction and immutable afterwards.
#[derive(Clone)]
pub struct RecipeApi {
    http: Client,
    config: Arc<ApiConfig>,
}

impl RecipeApi {
    pub fn new(config: ApiConfig) -> Result<Self, SearchError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent("recipe-search/0.1")
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Free-text list call: GET `{base}/complexSearch`.
    pub async fn complex_search(&self, query: &RecipeQuery) -> Result<SearchResponse, SearchError> {
        self.get_with_retry("complexSearch", &query.query_pairs()).await
    }

    /// Ingredient list call: GET `{base}/findByIngredients`. The response is
    /// a bare JSON array of summary records.
    pub async fn find_by_ingredients(
        &self,
        query: &RecipeQuery,
    ) -> Result<Vec<Recipe>, SearchError> {
        self.get_with_retry("findByIngredients", &query.query_pairs()).await
    }

    /// Per-id detail call: GET `{base}/{id}/information`.
    ///
    /// Never retried; callers degrade the item to its summary record on
    /// failure instead.
    pub async fn recipe_information(&self, id: u64) -> Result<Recipe, SearchError> {
        self.get(&format!("{id}/information"), &[]).await
    }

    /// List calls get a bounded retry for transient failures. The loop exits
    /// through the final attempt's error, so a dead API never leaves the
    /// caller waiting forever.
    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, SearchError> {
        let attempts = self.config.retry_attempts.max(1);
        let mut attempt = 0;

        loop {
            match self.get(path, params).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if attempt >= attempts || !e.is_retryable() {
                        return Err(e);
                    }
                    warn!("{path} failed ({e}), retrying");
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
            }
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, SearchError> {
        if self.config.api_key.is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .query(&[("apiKey", self.config.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn api_for(server: &Server) -> RecipeApi {
        RecipeApi::new(ApiConfig::for_base_url(server.url())).unwrap()
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let mut server = Server::new_async().await;
        let mock = server.mock("GET", "/complexSearch").expect(0).create_async().await;

        let config = ApiConfig {
            base_url: server.url(),
            ..ApiConfig::default()
        };
        let api = RecipeApi::new(config).unwrap();
        let query = RecipeQuery::direct("chicken").unwrap();

        let result = api.complex_search(&query).await;
        assert!(matches!(result, Err(SearchError::MissingApiKey)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complex_search_sends_expected_params() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/complexSearch")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
                Matcher::UrlEncoded("query".into(), "chicken".into()),
                Matcher::UrlEncoded("number".into(), "10".into()),
                Matcher::UrlEncoded("offset".into(), "0".into()),
                Matcher::UrlEncoded("addRecipeInformation".into(), "true".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"results": [{"id": 1, "title": "Chicken Pie"}], "totalResults": 1}"#)
            .create_async()
            .await;

        let api = api_for(&server);
        let query = RecipeQuery::direct("chicken").unwrap();
        let response = api.complex_search(&query).await.unwrap();

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].title, "Chicken Pie");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_auth_failure_is_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/complexSearch")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message": "You are not authorized"}"#)
            .expect(1)
            .create_async()
            .await;

        let api = api_for(&server);
        let query = RecipeQuery::direct("chicken").unwrap();

        match api.complex_search(&query).await {
            Err(SearchError::Api { status, .. }) => assert_eq!(status, 401),
            other => panic!("expected Api error, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_retried_once() {
        let mut server = Server::new_async().await;
        let failing = server
            .mock("GET", "/findByIngredients")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("overloaded")
            .expect(2)
            .create_async()
            .await;

        let api = api_for(&server);
        let query = RecipeQuery::by_ingredients("tomato").unwrap();

        let result = api.find_by_ingredients(&query).await;
        assert!(matches!(result, Err(SearchError::Api { status: 503, .. })));
        failing.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/recipes/42/information")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let config = ApiConfig::for_base_url(format!("{}/recipes", server.url()));
        let api = RecipeApi::new(config).unwrap();

        let result = api.recipe_information(42).await;
        assert!(matches!(result, Err(SearchError::MalformedResponse(_))));
    }
}
