//! Flattening generated plans into `dietas` rows.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::store::{DietMeal, DietStore, NewDiet, StoredDiet};
use crate::types::{GeneratedPlan, MealSlot, SlotKind};

/// `dia` used for single-day plans.
pub const TODAY_LABEL: &str = "Hoy";

/// Save request as sent by the UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavePlan {
    pub name: String,
    #[serde(default)]
    pub plan: Option<GeneratedPlan>,
    pub target_calories: u32,
    #[serde(default)]
    pub diet: Option<String>,
}

fn tag(meals: &[MealSlot], dia: &str, dia_numero: u8) -> impl Iterator<Item = DietMeal> {
    let dia = dia.to_string();
    meals.iter().enumerate().map(move |(i, meal)| DietMeal {
        meal: meal.clone(),
        tipo: SlotKind::from_position(i).label().to_string(),
        dia: dia.clone(),
        dia_numero,
    })
}

/// Build the row for `patient_id` starting on `start`.
///
/// `tipo` follows the meal's position in its day, so on a day where
/// breakfast was a free meal the lunch is stored as `desayuno`.
pub fn flatten(
    patient_id: &str,
    request: &SavePlan,
    start: NaiveDate,
) -> Result<NewDiet, PlannerError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(PlannerError::Validation("diet name is required".into()));
    }
    let Some(plan) = &request.plan else {
        return Err(PlannerError::Validation(
            "generate a plan before saving".into(),
        ));
    };

    let (meals, span): (Vec<DietMeal>, u64) = match plan {
        GeneratedPlan::Week(week) => (
            week.iter()
                .flat_map(|(day, p)| tag(&p.meals, day.label(), day.number()))
                .collect(),
            7,
        ),
        GeneratedPlan::Day(day) => (tag(&day.meals, TODAY_LABEL, 1).collect(), 1),
    };
    let end_date = start
        .checked_add_days(Days::new(span))
        .ok_or_else(|| PlannerError::Validation(format!("start date {start} is out of range")))?;
    let notes = request
        .diet
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| format!("Tipo de dieta: {d}"));

    Ok(NewDiet {
        patient_id: patient_id.to_string(),
        name: name.to_string(),
        start_date: start,
        end_date: Some(end_date),
        calories: request.target_calories,
        meals,
        notes,
    })
}

pub async fn save_plan(
    store: &dyn DietStore,
    patient_id: &str,
    request: &SavePlan,
    start: NaiveDate,
) -> Result<StoredDiet, PlannerError> {
    let row = flatten(patient_id, request, start)?;
    let meals = row.meals.len();
    let stored = store.create(row).await?;
    tracing::info!(diet_id = %stored.id, patient_id, meals, "diet saved");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDietStore;
    use crate::types::{DayPlan, WeekPlan, Weekday};
    use spoonacular_client::CandidateRecipe;

    fn meal(id: u64) -> MealSlot {
        MealSlot::from(CandidateRecipe {
            id,
            title: format!("meal {id}"),
            ready_in_minutes: Some(10),
            servings: Some(1),
            source_url: None,
            image: None,
        })
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    fn week() -> WeekPlan {
        let mut plan = WeekPlan::default();
        for day in Weekday::ALL {
            let count = match day {
                Weekday::Saturday => 2,
                Weekday::Sunday => 1,
                _ => 3,
            };
            plan.days.insert(
                day,
                DayPlan {
                    meals: (0..count).map(|i| meal(day.number() as u64 * 10 + i)).collect(),
                    ..Default::default()
                },
            );
        }
        plan
    }

    #[test]
    fn week_rows_carry_day_tags() {
        let req = SavePlan {
            name: " Semana 1 ".into(),
            plan: Some(GeneratedPlan::Week(week())),
            target_calories: 1800,
            diet: Some("vegan".into()),
        };
        let row = flatten("p1", &req, start()).unwrap();
        assert_eq!(row.name, "Semana 1");
        assert_eq!(row.meals.len(), 18);
        assert_eq!(row.end_date, NaiveDate::from_ymd_opt(2026, 10, 19));
        assert_eq!(row.calories, 1800);
        assert_eq!(row.notes.as_deref(), Some("Tipo de dieta: vegan"));

        let sunday: Vec<_> = row.meals.iter().filter(|m| m.dia_numero == 7).collect();
        assert_eq!(sunday.len(), 1);
        assert_eq!(sunday[0].dia, "Domingo");
        assert_eq!(sunday[0].tipo, "desayuno");
        let monday: Vec<_> = row.meals.iter().map(|m| m.tipo.as_str()).take(3).collect();
        assert_eq!(monday, vec!["desayuno", "almuerzo", "cena"]);
    }

    #[test]
    fn day_rows_are_today() {
        let req = SavePlan {
            name: "Hoy".into(),
            plan: Some(GeneratedPlan::Day(DayPlan {
                meals: vec![meal(1), meal(2)],
                ..Default::default()
            })),
            target_calories: 2000,
            diet: None,
        };
        let row = flatten("p1", &req, start()).unwrap();
        assert!(row.meals.iter().all(|m| m.dia == TODAY_LABEL && m.dia_numero == 1));
        assert_eq!(row.end_date, NaiveDate::from_ymd_opt(2026, 10, 13));
        assert!(row.notes.is_none());
    }

    #[test]
    fn missing_name_or_plan_is_rejected() {
        let mut req = SavePlan {
            name: "   ".into(),
            plan: Some(GeneratedPlan::Day(DayPlan::default())),
            target_calories: 2000,
            diet: None,
        };
        assert!(matches!(
            flatten("p1", &req, start()),
            Err(PlannerError::Validation(_))
        ));
        req.name = "ok".into();
        req.plan = None;
        assert!(matches!(
            flatten("p1", &req, start()),
            Err(PlannerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn saved_day_reads_back() {
        let store = InMemoryDietStore::new();
        let req = SavePlan {
            name: "Lunes ligero".into(),
            plan: Some(GeneratedPlan::Day(DayPlan {
                meals: vec![meal(1), meal(2)],
                ..Default::default()
            })),
            target_calories: 2000,
            diet: None,
        };
        save_plan(&store, "p9", &req, start()).await.unwrap();
        let listed = store.list_for_patient("p9").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].diet.meals.len(), 2);
        assert_eq!(listed[0].diet.calories, 2000);
    }
}
