//! Error types for plan generation and saving.

use spoonacular_client::RecipeError;
use thiserror::Error;

use crate::store::StoreError;

/// Planner errors.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Recipe(#[from] RecipeError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("plan generation cancelled")]
    Cancelled,
}

impl PlannerError {
    /// Single message for the UI error area.
    pub fn user_message(&self) -> String {
        match self {
            PlannerError::Recipe(RecipeError::NotConfigured(_)) => {
                "The recipe API key is not configured. Set SPOONACULAR_API_KEY and restart the service."
                    .to_string()
            }
            PlannerError::Recipe(RecipeError::RateLimitExceeded(msg)) => format!(
                "{msg} The daily points limit resets every 24 hours; please try again tomorrow."
            ),
            PlannerError::Recipe(RecipeError::ServiceUnavailable(_)) => {
                "Could not reach the recipe service. Check your connection and try again later."
                    .to_string()
            }
            PlannerError::Validation(msg) => msg.clone(),
            PlannerError::Store(e) => e.to_string(),
            PlannerError::Cancelled => "Plan generation was cancelled.".to_string(),
        }
    }
}

/// Result type alias for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_message_keeps_provider_text() {
        let err = PlannerError::from(RecipeError::RateLimitExceeded(
            "Your daily points limit of 150 has been reached.".into(),
        ));
        let msg = err.user_message();
        assert!(msg.starts_with("Your daily points limit of 150 has been reached."));
        assert!(msg.contains("tomorrow"));
    }

    #[test]
    fn validation_message_is_verbatim() {
        let err = PlannerError::Validation("name required".into());
        assert_eq!(err.user_message(), "name required");
    }
}
