//! Protein/carbs/fat percentage split kept at 100% while the user edits it.

use serde::{Deserialize, Serialize};

/// Allowed distance from 100 after per-component rounding.
pub const SUM_TOLERANCE: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Macro {
    Protein,
    Carbs,
    Fat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl Default for MacroSplit {
    fn default() -> Self {
        Self {
            protein: 30,
            carbs: 40,
            fat: 30,
        }
    }
}

impl MacroSplit {
    pub fn sum(&self) -> u32 {
        self.protein
            .saturating_add(self.carbs)
            .saturating_add(self.fat)
    }

    /// Gate for plan generation with macro constraints active.
    pub fn is_valid(&self) -> bool {
        self.sum().abs_diff(100) <= SUM_TOLERANCE
    }

    pub fn get(&self, which: Macro) -> u32 {
        match which {
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }

    /// Set one component and rescale the other two to their current ratio so
    /// the total returns to 100. Values above 100 are clamped. Each rescaled
    /// component is rounded on its own, so the sum can land on 99 or 101.
    pub fn adjust(&self, which: Macro, value: u32) -> MacroSplit {
        let value = value.min(100);
        let remaining = 100 - value;
        let (first, second) = match which {
            Macro::Protein => (self.carbs, self.fat),
            Macro::Carbs => (self.protein, self.fat),
            Macro::Fat => (self.protein, self.carbs),
        };
        let others = first.saturating_add(second);
        let (first, second) = if others == 0 {
            (remaining / 2, remaining - remaining / 2)
        } else {
            let factor = f64::from(remaining) / f64::from(others);
            (
                (f64::from(first) * factor).round() as u32,
                (f64::from(second) * factor).round() as u32,
            )
        };
        match which {
            Macro::Protein => MacroSplit {
                protein: value,
                carbs: first,
                fat: second,
            },
            Macro::Carbs => MacroSplit {
                protein: first,
                carbs: value,
                fat: second,
            },
            Macro::Fat => MacroSplit {
                protein: first,
                carbs: second,
                fat: value,
            },
        }
    }
}
