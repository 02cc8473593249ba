//! Plan generation and persistence logic.
//!
//! # Modules
//!
//! - [`rules`]: per-weekday ingredient table
//! - [`macros`]: protein/carbs/fat split editing and validation
//! - [`day_plan`]: single-day assembly from candidate searches
//! - [`week_plan`]: Monday to Sunday orchestration
//! - [`persistence`]: flattening plans into saved diets

pub mod day_plan;
pub mod macros;
pub mod persistence;
pub mod rules;
pub mod week_plan;

pub use day_plan::{assemble_day, estimate_nutrients, never_cancelled, slot_ceiling};
pub use week_plan::generate_week;
