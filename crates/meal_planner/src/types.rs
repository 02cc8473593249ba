use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use spoonacular_client::CandidateRecipe;
use spoonacular_client::utils::{ImageSize, recipe_image_url, recipe_page_url};

use crate::domains::macros::MacroSplit;
use crate::error::PlannerError;

pub const DEFAULT_TARGET_CALORIES: u32 = 2000;

/// Days in plan order. `Ord` follows Monday..Sunday so a `BTreeMap` keyed by
/// weekday iterates in calendar order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    /// Day label stored with saved diets.
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Lunes",
            Weekday::Tuesday => "Martes",
            Weekday::Wednesday => "Miércoles",
            Weekday::Thursday => "Jueves",
            Weekday::Friday => "Viernes",
            Weekday::Saturday => "Sábado",
            Weekday::Sunday => "Domingo",
        }
    }

    /// 1 for Monday through 7 for Sunday.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }
}

impl std::str::FromStr for Weekday {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|d| d.key() == lowered)
            .ok_or_else(|| PlannerError::Validation(format!("unknown weekday: {s}")))
    }
}

/// Meal occasion within a day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Breakfast,
    Lunch,
    Dinner,
}

impl SlotKind {
    /// Share of the day's calorie target assigned to this slot.
    pub fn share(self) -> f64 {
        match self {
            SlotKind::Breakfast => 0.25,
            SlotKind::Lunch => 0.40,
            SlotKind::Dinner => 0.35,
        }
    }

    /// Slot inferred from a meal's position in a day's list.
    pub fn from_position(index: usize) -> Self {
        match index {
            0 => SlotKind::Breakfast,
            1 => SlotKind::Lunch,
            _ => SlotKind::Dinner,
        }
    }

    /// Slot label stored with saved diets.
    pub fn label(self) -> &'static str {
        match self {
            SlotKind::Breakfast => "desayuno",
            SlotKind::Lunch => "almuerzo",
            SlotKind::Dinner => "cena",
        }
    }
}

/// Recipe chosen for one meal occasion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSlot {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub ready_in_minutes: u32,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default)]
    pub source_url: String,
    /// Empty on rows saved from provider day plans, which only carry `imageType`.
    #[serde(default)]
    pub image: String,
}

fn default_servings() -> u32 {
    1
}

impl From<CandidateRecipe> for MealSlot {
    fn from(c: CandidateRecipe) -> Self {
        Self {
            id: c.id,
            ready_in_minutes: c.ready_in_minutes.unwrap_or(0),
            servings: c.servings.filter(|s| *s > 0).unwrap_or(1),
            source_url: c
                .source_url
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| recipe_page_url(c.id)),
            image: c
                .image
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| recipe_image_url(c.id, ImageSize::Medium)),
            title: c.title,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbohydrates: f64,
}

impl Add for NutrientTotals {
    type Output = NutrientTotals;

    fn add(self, rhs: Self) -> Self::Output {
        NutrientTotals {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            fat: self.fat + rhs.fat,
            carbohydrates: self.carbohydrates + rhs.carbohydrates,
        }
    }
}

impl AddAssign for NutrientTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for NutrientTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientTotals::default(), Add::add)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub meals: Vec<MealSlot>,
    pub nutrients: NutrientTotals,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    #[serde(rename = "week")]
    pub days: BTreeMap<Weekday, DayPlan>,
}

impl WeekPlan {
    pub fn day(&self, day: Weekday) -> Option<&DayPlan> {
        self.days.get(&day)
    }

    /// Days in Monday..Sunday order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DayPlan)> {
        self.days.iter().map(|(d, p)| (*d, p))
    }

    pub fn totals(&self) -> NutrientTotals {
        self.days.values().map(|d| d.nutrients).sum()
    }

    pub fn meal_count(&self) -> usize {
        self.days.values().map(|d| d.meals.len()).sum()
    }
}

/// A plan held by the caller between generation and saving.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "plan", rename_all = "lowercase")]
pub enum GeneratedPlan {
    Day(DayPlan),
    Week(WeekPlan),
}

/// Inputs shared by every generation path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    #[serde(default = "default_target_calories")]
    pub target_calories: u32,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub exclude: Option<String>,
    #[serde(default)]
    pub macros: Option<MacroSplit>,
}

fn default_target_calories() -> u32 {
    DEFAULT_TARGET_CALORIES
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            target_calories: DEFAULT_TARGET_CALORIES,
            diet: None,
            exclude: None,
            macros: None,
        }
    }
}

impl PlanRequest {
    pub fn new(target_calories: u32) -> Self {
        Self {
            target_calories,
            ..Default::default()
        }
    }

    pub fn diet(&self) -> Option<&str> {
        self.diet.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }

    pub fn exclude(&self) -> Option<&str> {
        self.exclude.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// Reject requests that must not reach the recipe service.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.target_calories == 0 {
            return Err(PlannerError::Validation(
                "target calories must be greater than zero".into(),
            ));
        }
        match &self.macros {
            Some(m) if [m.protein, m.carbs, m.fat].iter().any(|v| *v > 100) => Err(
                PlannerError::Validation("macro percentages must be between 0 and 100".into()),
            ),
            Some(m) if !m.is_valid() => Err(PlannerError::Validation(format!(
                "macro split must add up to 100% (got {}%)",
                m.sum()
            ))),
            _ => Ok(()),
        }
    }
}
