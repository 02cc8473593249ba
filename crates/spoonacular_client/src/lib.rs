//! `RecipeClient` trait and wire types for the Spoonacular recipe service.
//!
//! The client is a thin request/response mapper: no state, no retries. A
//! failed call surfaces immediately and retry policy belongs to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod utils;

/// Fallback text when a 402 response carries no usable message.
pub const DEFAULT_RATE_LIMIT_MESSAGE: &str = "daily points limit reached";

#[derive(Debug, Error)]
pub enum RecipeError {
    /// No usable API credential, or nothing to search for.
    #[error("recipe service not configured: {0}")]
    NotConfigured(String),
    /// HTTP 402 from the service. The message is the provider's own text.
    #[error("{0}")]
    RateLimitExceeded(String),
    /// Any other non-success status or a network failure.
    #[error("recipe service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl RecipeError {
    /// Map a non-success status and its body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 402 {
            #[derive(Deserialize)]
            struct QuotaBody {
                message: Option<String>,
            }
            let message = serde_json::from_str::<QuotaBody>(body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_RATE_LIMIT_MESSAGE.to_string());
            return RecipeError::RateLimitExceeded(message);
        }
        let snippet: String = body.chars().take(256).collect();
        RecipeError::ServiceUnavailable(format!("status {status}: {snippet}"))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RecipeError::RateLimitExceeded(_))
    }
}

impl From<reqwest::Error> for RecipeError {
    fn from(err: reqwest::Error) -> Self {
        RecipeError::ServiceUnavailable(err.to_string())
    }
}

/// A recipe returned by a search with `addRecipeInformation=true`.
///
/// Basic info fields are optional because the service omits them for some
/// records; see [`utils`] for the fallbacks used when building a meal.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecipe {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub results: Vec<CandidateRecipe>,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub original: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Nutrient {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub percent_of_daily_needs: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaloricBreakdown {
    pub percent_protein: f64,
    pub percent_fat: f64,
    pub percent_carbs: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
    #[serde(default)]
    pub caloric_breakdown: Option<CaloricBreakdown>,
}

/// Full recipe record from `/recipes/{id}/information`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_type: Option<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub cuisines: Vec<String>,
    #[serde(default)]
    pub dish_types: Vec<String>,
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
}

impl RecipeDetail {
    /// Look up a nutrient by name, ignoring case.
    pub fn nutrient(&self, name: &str) -> Option<&Nutrient> {
        self.nutrition
            .as_ref()?
            .nutrients
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RandomRecipes {
    #[serde(default)]
    pub recipes: Vec<RecipeDetail>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ProviderNutrients {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub carbohydrates: f64,
}

/// Day plan computed by the provider's own planner.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ProviderDayPlan {
    #[serde(default)]
    pub meals: Vec<CandidateRecipe>,
    #[serde(default)]
    pub nutrients: ProviderNutrients,
}

/// Optional filters for a free-text recipe search.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct SearchOptions {
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub max_calories: Option<u32>,
    pub min_protein: Option<u32>,
    pub number: Option<u32>,
}

#[async_trait]
pub trait RecipeClient: Send + Sync + 'static {
    /// Whether a usable credential is present. Pure; performs no I/O.
    fn is_configured(&self) -> bool;

    /// Search up to ten recipes that include the given comma-separated
    /// categories and fit under `max_calories`.
    async fn find_candidates(
        &self,
        categories: &str,
        diet: Option<&str>,
        exclude: Option<&str>,
        max_calories: Option<u32>,
    ) -> Result<Vec<CandidateRecipe>, RecipeError>;

    /// Fetch a recipe with ingredients and nutrient breakdown.
    async fn fetch_detail(&self, recipe_id: u64) -> Result<RecipeDetail, RecipeError>;

    async fn search_recipes(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, RecipeError>;

    async fn random_recipes(
        &self,
        number: u32,
        tags: Option<&str>,
    ) -> Result<RandomRecipes, RecipeError>;

    /// Ask the provider-native planner for a single day.
    async fn generate_day_plan(
        &self,
        target_calories: u32,
        diet: Option<&str>,
        exclude: Option<&str>,
    ) -> Result<ProviderDayPlan, RecipeError>;
}
