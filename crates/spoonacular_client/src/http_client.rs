//! HTTP client implementation for the Spoonacular API.
//!
//! This module provides a reqwest-based implementation of the [`RecipeClient`](crate::RecipeClient) trait.

use crate::config::Config;
use crate::utils::{is_placeholder_key, join_categories};
use crate::{
    CandidateRecipe, ProviderDayPlan, RandomRecipes, RecipeClient, RecipeDetail, RecipeError,
    SearchOptions, SearchResults,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

/// Candidates requested per search; also the upper bound on results.
pub const CANDIDATES_PER_SEARCH: u32 = 10;

/// Client for the Spoonacular API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestRecipeClient {
    base_url: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

impl ReqwestRecipeClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "https://api.spoonacular.com")
    /// * `api_key` - The API key; `None` leaves the client unconfigured
    pub fn new(base_url: &str, api_key: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.base_url, config.api_key.clone())
    }

    /// Return the API key or `NotConfigured` before any I/O happens.
    fn credential(&self) -> Result<&str, RecipeError> {
        match self.api_key.as_ref().map(|k| k.expose_secret()) {
            Some(key) if !is_placeholder_key(key) => Ok(key),
            _ => Err(RecipeError::NotConfigured(
                "SPOONACULAR_API_KEY is missing".into(),
            )),
        }
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str, key: &str) -> reqwest::RequestBuilder {
        self.client.get(url).query(&[("apiKey", key)])
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RecipeError> {
        tracing::debug!(endpoint, "calling recipe service");
        metrics::counter!("spoonacular_requests_total", "endpoint" => endpoint).increment(1);
        let resp = request.send().await?;
        record_quota(&resp);
        let status = resp.status();
        if !status.is_success() {
            let err = self.error_from_response(resp).await;
            metrics::counter!("spoonacular_request_failures_total", "endpoint" => endpoint)
                .increment(1);
            return Err(err);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> RecipeError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let err = RecipeError::from_status(status, &body);
        if err.is_rate_limited() {
            tracing::warn!(status, message = %err, "recipe service points limit reached");
        } else {
            tracing::warn!(status, "recipe service returned an error");
        }
        err
    }
}

/// Record the points the service reports for this call and for the day.
fn record_quota(resp: &reqwest::Response) {
    let header = |name: &str| {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<f64>().ok())
    };
    if let Some(cost) = header("x-api-quota-request") {
        metrics::histogram!("spoonacular_quota_request_points").record(cost);
    }
    if let Some(used) = header("x-api-quota-used") {
        metrics::gauge!("spoonacular_quota_used_points").set(used);
        tracing::debug!(quota_used = used, "recipe service quota");
    }
}

#[async_trait]
impl RecipeClient for ReqwestRecipeClient {
    fn is_configured(&self) -> bool {
        self.credential().is_ok()
    }

    async fn find_candidates(
        &self,
        categories: &str,
        diet: Option<&str>,
        exclude: Option<&str>,
        max_calories: Option<u32>,
    ) -> Result<Vec<CandidateRecipe>, RecipeError> {
        let key = self.credential()?;
        let include = join_categories(categories)
            .ok_or_else(|| RecipeError::NotConfigured("no categories to search for".into()))?;
        let url = format!("{}/recipes/complexSearch", self.base_url);

        let mut pairs: Vec<(&str, String)> = vec![
            ("includeIngredients", include),
            ("number", CANDIDATES_PER_SEARCH.to_string()),
            ("addRecipeInformation", "true".to_string()),
        ];
        if let Some(d) = diet.filter(|d| !d.trim().is_empty()) {
            pairs.push(("diet", d.to_string()));
        }
        if let Some(e) = exclude.filter(|e| !e.trim().is_empty()) {
            pairs.push(("exclude", e.to_string()));
        }
        if let Some(c) = max_calories {
            pairs.push(("maxCalories", c.to_string()));
        }
        let qp: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let results: SearchResults = self
            .execute_json("complex_search", self.get_request(&url, key).query(&qp))
            .await?;
        let mut candidates = results.results;
        candidates.truncate(CANDIDATES_PER_SEARCH as usize);
        Ok(candidates)
    }

    async fn fetch_detail(&self, recipe_id: u64) -> Result<RecipeDetail, RecipeError> {
        let key = self.credential()?;
        let url = format!("{}/recipes/{}/information", self.base_url, recipe_id);
        self.execute_json(
            "recipe_information",
            self.get_request(&url, key)
                .query(&[("includeNutrition", "true")]),
        )
        .await
    }

    async fn search_recipes(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, RecipeError> {
        let key = self.credential()?;
        let url = format!("{}/recipes/complexSearch", self.base_url);

        let mut pairs: Vec<(&str, String)> = vec![
            ("query", query.to_string()),
            (
                "number",
                options.number.unwrap_or(CANDIDATES_PER_SEARCH).to_string(),
            ),
            ("addRecipeInformation", "true".to_string()),
        ];
        if let Some(d) = &options.diet {
            pairs.push(("diet", d.clone()));
        }
        if let Some(c) = &options.cuisine {
            pairs.push(("cuisine", c.clone()));
        }
        if let Some(c) = options.max_calories {
            pairs.push(("maxCalories", c.to_string()));
        }
        if let Some(p) = options.min_protein {
            pairs.push(("minProtein", p.to_string()));
        }
        let qp: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();

        self.execute_json("complex_search", self.get_request(&url, key).query(&qp))
            .await
    }

    async fn random_recipes(
        &self,
        number: u32,
        tags: Option<&str>,
    ) -> Result<RandomRecipes, RecipeError> {
        let key = self.credential()?;
        let url = format!("{}/recipes/random", self.base_url);
        let mut pairs: Vec<(&str, String)> = vec![("number", number.to_string())];
        if let Some(t) = tags.filter(|t| !t.trim().is_empty()) {
            pairs.push(("tags", t.to_string()));
        }
        let qp: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.execute_json("random_recipes", self.get_request(&url, key).query(&qp))
            .await
    }

    async fn generate_day_plan(
        &self,
        target_calories: u32,
        diet: Option<&str>,
        exclude: Option<&str>,
    ) -> Result<ProviderDayPlan, RecipeError> {
        let key = self.credential()?;
        let url = format!("{}/mealplanner/generate", self.base_url);
        let mut pairs: Vec<(&str, String)> = vec![
            ("timeFrame", "day".to_string()),
            ("targetCalories", target_calories.to_string()),
        ];
        if let Some(d) = diet.filter(|d| !d.trim().is_empty()) {
            pairs.push(("diet", d.to_string()));
        }
        if let Some(e) = exclude.filter(|e| !e.trim().is_empty()) {
            pairs.push(("exclude", e.to_string()));
        }
        let qp: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.execute_json("meal_planner", self.get_request(&url, key).query(&qp))
            .await
    }
}
