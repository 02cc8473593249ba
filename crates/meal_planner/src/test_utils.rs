//! Shared test utilities and a scripted `RecipeClient` used by unit tests.
#![cfg(test)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use spoonacular_client::{
    CandidateRecipe, ProviderDayPlan, ProviderNutrients, RandomRecipes, RecipeClient,
    RecipeDetail, RecipeError, SearchOptions, SearchResults,
};

pub fn candidate(id: u64, title: &str) -> CandidateRecipe {
    CandidateRecipe {
        id,
        title: title.to_string(),
        ready_in_minutes: Some(20),
        servings: Some(2),
        source_url: Some(format!("https://example.test/recipes/{id}")),
        image: Some(format!("https://img.example.test/{id}.jpg")),
    }
}

pub fn detail(id: u64, title: &str) -> RecipeDetail {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "readyInMinutes": 15,
        "servings": 1,
        "extendedIngredients": [],
        "nutrition": { "nutrients": [
            { "name": "Calories", "amount": 420.0, "unit": "kcal" }
        ]}
    }))
    .expect("valid detail fixture")
}

/// One recorded `find_candidates` call.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateCall {
    pub categories: String,
    pub diet: Option<String>,
    pub exclude: Option<String>,
    pub max_calories: Option<u32>,
}

type Hook = Box<dyn Fn() + Send + Sync>;

/// Mock client answering candidate searches from a script.
///
/// Responses are looked up by the exact joined category string, falling back
/// to the default pool. Calls are 1-based for `rate_limit_at` and `on_call`.
pub struct ScriptedClient {
    configured: bool,
    default: Vec<CandidateRecipe>,
    by_category: HashMap<String, Result<Vec<CandidateRecipe>, RecipeError>>,
    rate_limit_at: Option<usize>,
    hooks: Vec<(usize, Hook)>,
    calls: Mutex<Vec<CandidateCall>>,
}

impl ScriptedClient {
    pub fn with_default(default: Vec<CandidateRecipe>) -> Self {
        Self {
            configured: true,
            default,
            by_category: HashMap::new(),
            rate_limit_at: None,
            hooks: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::with_default(Vec::new())
        }
    }

    pub fn respond(
        mut self,
        categories: &str,
        response: Result<Vec<CandidateRecipe>, RecipeError>,
    ) -> Self {
        self.by_category.insert(categories.to_string(), response);
        self
    }

    pub fn rate_limit_at(mut self, call: usize) -> Self {
        self.rate_limit_at = Some(call);
        self
    }

    pub fn on_call(mut self, call: usize, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.push((call, Box::new(hook)));
        self
    }

    pub fn calls(&self) -> Vec<CandidateCall> {
        self.calls.lock().expect("calls lock").clone()
    }
}

fn clone_result(
    r: &Result<Vec<CandidateRecipe>, RecipeError>,
) -> Result<Vec<CandidateRecipe>, RecipeError> {
    match r {
        Ok(v) => Ok(v.clone()),
        Err(RecipeError::NotConfigured(m)) => Err(RecipeError::NotConfigured(m.clone())),
        Err(RecipeError::RateLimitExceeded(m)) => Err(RecipeError::RateLimitExceeded(m.clone())),
        Err(RecipeError::ServiceUnavailable(m)) => {
            Err(RecipeError::ServiceUnavailable(m.clone()))
        }
    }
}

#[async_trait]
impl RecipeClient for ScriptedClient {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn find_candidates(
        &self,
        categories: &str,
        diet: Option<&str>,
        exclude: Option<&str>,
        max_calories: Option<u32>,
    ) -> Result<Vec<CandidateRecipe>, RecipeError> {
        let n = {
            let mut calls = self.calls.lock().expect("calls lock");
            calls.push(CandidateCall {
                categories: categories.to_string(),
                diet: diet.map(str::to_string),
                exclude: exclude.map(str::to_string),
                max_calories,
            });
            calls.len()
        };
        for (at, hook) in &self.hooks {
            if *at == n {
                hook();
            }
        }
        if self.rate_limit_at == Some(n) {
            return Err(RecipeError::RateLimitExceeded(
                "Your daily points limit of 150 has been reached.".into(),
            ));
        }
        match self.by_category.get(categories) {
            Some(r) => clone_result(r),
            None => Ok(self.default.clone()),
        }
    }

    async fn fetch_detail(&self, recipe_id: u64) -> Result<RecipeDetail, RecipeError> {
        if recipe_id == 0 {
            return Err(RecipeError::ServiceUnavailable("status 404: not found".into()));
        }
        Ok(detail(recipe_id, "Scripted recipe"))
    }

    async fn search_recipes(
        &self,
        _query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResults, RecipeError> {
        let number = options.number.unwrap_or(10) as usize;
        let results: Vec<_> = self.default.iter().take(number).cloned().collect();
        Ok(SearchResults {
            total_results: self.default.len() as u32,
            results,
        })
    }

    async fn random_recipes(
        &self,
        number: u32,
        _tags: Option<&str>,
    ) -> Result<RandomRecipes, RecipeError> {
        Ok(RandomRecipes {
            recipes: (1..=u64::from(number))
                .map(|i| detail(i, "Random recipe"))
                .collect(),
        })
    }

    async fn generate_day_plan(
        &self,
        target_calories: u32,
        _diet: Option<&str>,
        _exclude: Option<&str>,
    ) -> Result<ProviderDayPlan, RecipeError> {
        Ok(ProviderDayPlan {
            meals: self.default.iter().take(3).cloned().collect(),
            nutrients: ProviderNutrients {
                calories: f64::from(target_calories),
                protein: 90.0,
                fat: 60.0,
                carbohydrates: 250.0,
            },
        })
    }
}
