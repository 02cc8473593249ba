//! Single-day assembly: one candidate search per slot, random pick, estimated
//! nutrients.
//!
//! Nutrients are estimated from the slot's calorie ceiling with a fixed
//! 15/30/55 protein/fat/carbohydrate ratio instead of a second detail call,
//! so a day costs at most one search per slot.

use rand::Rng;
use rand::seq::SliceRandom;
use spoonacular_client::utils::join_categories;
use spoonacular_client::{RecipeClient, RecipeError};
use tokio::sync::watch;

use crate::domains::rules::DayRule;
use crate::error::PlannerError;
use crate::types::{DayPlan, MealSlot, NutrientTotals, PlanRequest, SlotKind};

const PROTEIN_SHARE: f64 = 0.15;
const FAT_SHARE: f64 = 0.30;
const CARB_SHARE: f64 = 0.55;
const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;
const KCAL_PER_GRAM_CARB: f64 = 4.0;

/// Calorie ceiling for one slot, rounded to whole kcal.
pub fn slot_ceiling(target_calories: u32, slot: SlotKind) -> u32 {
    (f64::from(target_calories) * slot.share()).round() as u32
}

/// Estimated nutrients for a meal worth `calories`.
pub fn estimate_nutrients(calories: u32) -> NutrientTotals {
    let kcal = f64::from(calories);
    NutrientTotals {
        calories: kcal,
        protein: (kcal * PROTEIN_SHARE / KCAL_PER_GRAM_PROTEIN).round(),
        fat: (kcal * FAT_SHARE / KCAL_PER_GRAM_FAT).round(),
        carbohydrates: (kcal * CARB_SHARE / KCAL_PER_GRAM_CARB).round(),
    }
}

/// A receiver that never reports cancellation.
pub fn never_cancelled() -> watch::Receiver<bool> {
    let (_tx, rx) = watch::channel(false);
    rx
}

/// Build one day from `rule`.
///
/// Slots are searched in breakfast, lunch, dinner order. A slot with no rule
/// or with only blank keywords is a free meal and costs no call. A search
/// with no results leaves the slot empty. Any client error aborts the day.
pub async fn assemble_day<R>(
    client: &dyn RecipeClient,
    request: &PlanRequest,
    rule: &DayRule,
    rng: &mut R,
    cancel: &watch::Receiver<bool>,
) -> Result<DayPlan, PlannerError>
where
    R: Rng + Send + ?Sized,
{
    if !client.is_configured() {
        return Err(RecipeError::NotConfigured("SPOONACULAR_API_KEY is missing".into()).into());
    }

    let mut meals = Vec::with_capacity(3);
    let mut nutrients = NutrientTotals::default();

    for (slot, keywords) in rule.slots() {
        let Some(categories) = keywords.and_then(join_categories) else {
            tracing::debug!(?slot, "free meal");
            continue;
        };
        if *cancel.borrow() {
            return Err(PlannerError::Cancelled);
        }

        let ceiling = slot_ceiling(request.target_calories, slot);
        tracing::debug!(?slot, %categories, max_calories = ceiling, "searching candidates");
        let candidates = client
            .find_candidates(&categories, request.diet(), request.exclude(), Some(ceiling))
            .await?;

        let Some(choice) = candidates.choose(rng) else {
            tracing::debug!(?slot, %categories, "no candidates; leaving slot empty");
            continue;
        };
        meals.push(MealSlot::from(choice.clone()));
        nutrients += estimate_nutrients(ceiling);
    }

    Ok(DayPlan { meals, nutrients })
}
