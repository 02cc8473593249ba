//! Seven-day generation driven by the weekday rule table.

use rand::Rng;
use spoonacular_client::{RecipeClient, RecipeError};
use tokio::sync::watch;

use crate::domains::day_plan::assemble_day;
use crate::domains::rules::WEEK_RULES;
use crate::error::PlannerError;
use crate::types::{PlanRequest, WeekPlan};

/// Generate Monday through Sunday in order.
///
/// Days run one after another; the first failing day aborts the week and no
/// later day is requested. The macro split, if present, is checked before any
/// call but does not change the estimates.
pub async fn generate_week<R>(
    client: &dyn RecipeClient,
    request: &PlanRequest,
    rng: &mut R,
    cancel: &watch::Receiver<bool>,
) -> Result<WeekPlan, PlannerError>
where
    R: Rng + Send + ?Sized,
{
    request.validate()?;
    if !client.is_configured() {
        return Err(RecipeError::NotConfigured("SPOONACULAR_API_KEY is missing".into()).into());
    }
    if let Some(split) = &request.macros {
        tracing::info!(
            protein = split.protein,
            carbs = split.carbs,
            fat = split.fat,
            "macro split accepted"
        );
    }

    let mut plan = WeekPlan::default();
    for (day, rule) in WEEK_RULES.iter() {
        match assemble_day(client, request, rule, rng, cancel).await {
            Ok(day_plan) => {
                tracing::debug!(day = day.key(), meals = day_plan.meals.len(), "day assembled");
                plan.days.insert(*day, day_plan);
            }
            Err(e) => {
                tracing::warn!(day = day.key(), error = %e, "week generation aborted");
                return Err(e);
            }
        }
    }

    tracing::info!(
        target_calories = request.target_calories,
        meals = plan.meal_count(),
        "week plan generated"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::day_plan::{estimate_nutrients, never_cancelled, slot_ceiling};
    use crate::domains::macros::MacroSplit;
    use crate::test_utils::{ScriptedClient, candidate};
    use crate::types::{NutrientTotals, SlotKind, Weekday};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool() -> Vec<spoonacular_client::CandidateRecipe> {
        (1..=4).map(|i| candidate(i, &format!("recipe {i}"))).collect()
    }

    #[tokio::test]
    async fn week_has_seven_days_in_order() {
        let client = ScriptedClient::with_default(pool());
        let mut rng = StdRng::seed_from_u64(11);
        let plan = generate_week(&client, &PlanRequest::new(2000), &mut rng, &never_cancelled())
            .await
            .expect("week");
        let days: Vec<_> = plan.iter().map(|(d, _)| d).collect();
        assert_eq!(days, Weekday::ALL.to_vec());
        // 5 full days + Saturday breakfast/lunch + Sunday breakfast
        assert_eq!(plan.meal_count(), 18);
        assert_eq!(client.calls().len(), 18);
    }

    #[tokio::test]
    async fn day_calories_equal_slot_estimates() {
        let client = ScriptedClient::with_default(pool());
        let mut rng = StdRng::seed_from_u64(5);
        let plan = generate_week(&client, &PlanRequest::new(2000), &mut rng, &never_cancelled())
            .await
            .expect("week");
        let monday = plan.day(Weekday::Monday).expect("monday");
        assert_eq!(monday.nutrients.calories, 2000.0);
        let saturday = plan.day(Weekday::Saturday).expect("saturday");
        assert_eq!(saturday.meals.len(), 2);
        assert_eq!(
            saturday.nutrients,
            estimate_nutrients(500) + estimate_nutrients(800)
        );
        let sunday = plan.day(Weekday::Sunday).expect("sunday");
        assert_eq!(sunday.meals.len(), 1);
        assert_eq!(sunday.nutrients.calories, 500.0);
    }

    #[tokio::test]
    async fn rate_limit_stops_later_days() {
        // Tuesday lunch is the 5th search of the week
        let client = ScriptedClient::with_default(pool()).rate_limit_at(5);
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_week(&client, &PlanRequest::new(2000), &mut rng, &never_cancelled())
            .await
            .expect_err("aborted");
        assert!(matches!(
            err,
            PlannerError::Recipe(RecipeError::RateLimitExceeded(_))
        ));
        let calls = client.calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[4].categories, "salmon");
    }

    #[tokio::test]
    async fn invalid_macros_fail_before_any_call() {
        let client = ScriptedClient::with_default(pool());
        let request = PlanRequest {
            macros: Some(MacroSplit {
                protein: 60,
                carbs: 40,
                fat: 30,
            }),
            ..PlanRequest::new(2000)
        };
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_week(&client, &request, &mut rng, &never_cancelled())
            .await
            .expect_err("invalid");
        assert!(matches!(err, PlannerError::Validation(_)));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn valid_macros_do_not_change_estimates() {
        let client = ScriptedClient::with_default(pool());
        let request = PlanRequest {
            macros: Some(MacroSplit {
                protein: 50,
                carbs: 29,
                fat: 21,
            }),
            ..PlanRequest::new(2000)
        };
        let mut rng = StdRng::seed_from_u64(1);
        let plan = generate_week(&client, &request, &mut rng, &never_cancelled())
            .await
            .expect("week");
        let monday = plan.day(Weekday::Monday).expect("monday");
        let expected: NutrientTotals = [SlotKind::Breakfast, SlotKind::Lunch, SlotKind::Dinner]
            .into_iter()
            .map(|s| estimate_nutrients(slot_ceiling(2000, s)))
            .sum();
        assert_eq!(monday.nutrients, expected);
    }

    #[tokio::test]
    async fn cancellation_mid_week_stops_calls() {
        let (tx, rx) = watch::channel(false);
        let client = ScriptedClient::with_default(pool()).on_call(3, move || {
            let _ = tx.send(true);
        });
        let mut rng = StdRng::seed_from_u64(1);
        let err = generate_week(&client, &PlanRequest::new(2000), &mut rng, &rx)
            .await
            .expect_err("cancelled");
        assert!(matches!(err, PlannerError::Cancelled));
        assert_eq!(client.calls().len(), 3);
    }

    #[test]
    fn slot_order_matches_rules() {
        let kinds: Vec<_> = WEEK_RULES[0].1.slots().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![SlotKind::Breakfast, SlotKind::Lunch, SlotKind::Dinner]
        );
    }
}
