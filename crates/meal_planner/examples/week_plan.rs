use std::sync::Arc;

use meal_planner::MealPlanService;
use meal_planner::domains::never_cancelled;
use meal_planner::store::InMemoryDietStore;
use meal_planner::types::PlanRequest;
use spoonacular_client::{config::Config, http_client::ReqwestRecipeClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects SPOONACULAR_API_KEY in env; costs up to 18 searches
    let cfg = Config::from_env()?;
    let service = MealPlanService::new(
        Arc::new(ReqwestRecipeClient::from_config(&cfg)),
        Arc::new(InMemoryDietStore::new()),
    );
    let target = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2000);

    let plan = match service
        .generate_week(&PlanRequest::new(target), &never_cancelled())
        .await
    {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Ok(());
        }
    };
    for (day, p) in plan.iter() {
        println!("{} ({:.0} kcal)", day.label(), p.nutrients.calories);
        for meal in &p.meals {
            println!("  {:>8}  {}", meal.id, meal.title);
        }
    }
    Ok(())
}
