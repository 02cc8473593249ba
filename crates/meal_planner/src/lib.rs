//! Meal-plan generation service.
//!
//! [`MealPlanService`] ties a [`RecipeClient`] and a [`DietStore`] together
//! and is the single entry point used by the HTTP routes.

use std::sync::Arc;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;

use spoonacular_client::{RandomRecipes, RecipeClient, RecipeDetail, SearchOptions, SearchResults};

pub mod config;
pub mod domains;
pub mod error;
pub mod routes;
pub mod store;
pub mod types;

mod test_utils;

pub use error::{PlannerError, PlannerResult};

use domains::macros::{Macro, MacroSplit};
use domains::persistence::{SavePlan, save_plan};
use domains::rules::rule_for;
use store::{DietStore, StoredDiet};
use types::{DayPlan, MealSlot, NutrientTotals, PlanRequest, WeekPlan, Weekday};

#[derive(Clone)]
pub struct MealPlanService {
    client: Arc<dyn RecipeClient>,
    store: Arc<dyn DietStore>,
}

impl MealPlanService {
    pub fn new(client: Arc<dyn RecipeClient>, store: Arc<dyn DietStore>) -> Self {
        Self { client, store }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    /// Daily plan from the provider's own planner.
    pub async fn generate_provider_day(&self, request: &PlanRequest) -> PlannerResult<DayPlan> {
        request.validate()?;
        let plan = self
            .client
            .generate_day_plan(request.target_calories, request.diet(), request.exclude())
            .await?;
        metrics::counter!("meal_plans_generated_total", "kind" => "provider_day").increment(1);
        Ok(DayPlan {
            meals: plan.meals.into_iter().map(MealSlot::from).collect(),
            nutrients: NutrientTotals {
                calories: plan.nutrients.calories,
                protein: plan.nutrients.protein,
                fat: plan.nutrients.fat,
                carbohydrates: plan.nutrients.carbohydrates,
            },
        })
    }

    /// One day built from the rule for `weekday`.
    pub async fn generate_day(
        &self,
        weekday: Weekday,
        request: &PlanRequest,
        cancel: &watch::Receiver<bool>,
    ) -> PlannerResult<DayPlan> {
        request.validate()?;
        let mut rng = StdRng::from_entropy();
        let plan = domains::assemble_day(
            self.client.as_ref(),
            request,
            &rule_for(weekday),
            &mut rng,
            cancel,
        )
        .await?;
        metrics::counter!("meal_plans_generated_total", "kind" => "rule_day").increment(1);
        tracing::info!(day = weekday.key(), meals = plan.meals.len(), "day plan generated");
        Ok(plan)
    }

    pub async fn generate_week(
        &self,
        request: &PlanRequest,
        cancel: &watch::Receiver<bool>,
    ) -> PlannerResult<WeekPlan> {
        let mut rng = StdRng::from_entropy();
        let plan =
            domains::generate_week(self.client.as_ref(), request, &mut rng, cancel).await?;
        metrics::counter!("meal_plans_generated_total", "kind" => "week").increment(1);
        Ok(plan)
    }

    pub async fn recipe_detail(&self, recipe_id: u64) -> PlannerResult<RecipeDetail> {
        Ok(self.client.fetch_detail(recipe_id).await?)
    }

    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> PlannerResult<SearchResults> {
        if query.trim().is_empty() {
            return Err(PlannerError::Validation("search query is required".into()));
        }
        Ok(self.client.search_recipes(query.trim(), options).await?)
    }

    pub async fn random(&self, number: u32, tags: Option<&str>) -> PlannerResult<RandomRecipes> {
        if number == 0 {
            return Err(PlannerError::Validation("number must be at least 1".into()));
        }
        Ok(self.client.random_recipes(number, tags).await?)
    }

    pub fn adjust_macros(&self, split: MacroSplit, which: Macro, value: u32) -> MacroSplit {
        split.adjust(which, value)
    }

    /// Save a generated plan starting today.
    pub async fn save_plan(
        &self,
        patient_id: &str,
        request: &SavePlan,
    ) -> PlannerResult<StoredDiet> {
        let today = Utc::now().date_naive();
        save_plan(self.store.as_ref(), patient_id, request, today).await
    }

    pub async fn list_diets(&self, patient_id: &str) -> PlannerResult<Vec<StoredDiet>> {
        Ok(self.store.list_for_patient(patient_id).await?)
    }

    pub async fn delete_diet(&self, diet_id: &str) -> PlannerResult<()> {
        self.store.delete(diet_id).await?;
        tracing::info!(diet_id, "diet deleted");
        Ok(())
    }
}
