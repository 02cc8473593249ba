//! Fixed per-weekday ingredient rules that drive week generation.

use crate::types::{SlotKind, Weekday};

/// Category keywords per slot. `None` marks a free meal: no search is made
/// and the slot is left empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayRule {
    pub breakfast: &'static str,
    pub lunch: Option<&'static str>,
    pub dinner: Option<&'static str>,
}

const BREAKFAST: &str = "oatmeal, fruits";

pub const WEEK_RULES: [(Weekday, DayRule); 7] = [
    (
        Weekday::Monday,
        DayRule {
            breakfast: BREAKFAST,
            lunch: Some("beans, vegetables"),
            dinner: Some("vegetables, tofu"),
        },
    ),
    (
        Weekday::Tuesday,
        DayRule {
            breakfast: BREAKFAST,
            lunch: Some("salmon"),
            dinner: Some("egg, vegetables"),
        },
    ),
    (
        Weekday::Wednesday,
        DayRule {
            breakfast: BREAKFAST,
            lunch: Some("tofu, vegetables"),
            dinner: Some("egg, vegetables"),
        },
    ),
    (
        Weekday::Thursday,
        DayRule {
            breakfast: BREAKFAST,
            lunch: Some("lentils, vegetables"),
            dinner: Some("tofu"),
        },
    ),
    (
        Weekday::Friday,
        DayRule {
            breakfast: BREAKFAST,
            lunch: Some("fish, cod"),
            dinner: Some("pizza"),
        },
    ),
    (
        Weekday::Saturday,
        DayRule {
            breakfast: BREAKFAST,
            lunch: Some("seafood shrimp"),
            dinner: None,
        },
    ),
    (
        Weekday::Sunday,
        DayRule {
            breakfast: BREAKFAST,
            lunch: None,
            dinner: None,
        },
    ),
];

impl DayRule {
    /// Slots in serving order with their keywords.
    pub fn slots(&self) -> [(SlotKind, Option<&'static str>); 3] {
        [
            (SlotKind::Breakfast, Some(self.breakfast)),
            (SlotKind::Lunch, self.lunch),
            (SlotKind::Dinner, self.dinner),
        ]
    }
}

pub fn rule_for(day: Weekday) -> DayRule {
    WEEK_RULES[day as usize].1
}
