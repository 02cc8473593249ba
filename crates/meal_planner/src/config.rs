//! Server settings read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;
use spoonacular_client::config::Config as RecipeConfig;

use crate::error::PlannerError;

/// A week runs up to 18 sequential recipe searches and must fit inside this
/// limit.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Supabase project holding the `dietas` table.
#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: SecretString,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub address: SocketAddr,
    pub request_timeout: Duration,
    pub log_filter: String,
    pub recipes: RecipeConfig,
    /// `None` keeps saved diets in memory.
    pub supabase: Option<SupabaseConfig>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, PlannerError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(mut get: F) -> Result<Self, PlannerError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let address = match get("ADDRESS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| PlannerError::Validation(format!("ADDRESS is not a socket address: {raw}")))?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };
        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    PlannerError::Validation(format!(
                        "REQUEST_TIMEOUT_SECS must be a positive integer, got {raw}"
                    ))
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let log_filter = get("MEAL_PLANNER_LOG_LEVEL")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_KEY")) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Some(SupabaseConfig {
                    url: url.trim().to_string(),
                    key: SecretString::new(key.trim().into()),
                })
            }
            _ => None,
        };

        let recipes = RecipeConfig::from_env_with(&mut get)?;

        Ok(Self {
            address,
            request_timeout,
            log_filter,
            recipes,
            supabase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = ServerConfig::from_env_with(env(&[])).unwrap();
        assert_eq!(cfg.address, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(cfg.request_timeout >= Duration::from_secs(120));
        assert_eq!(cfg.log_filter, "info");
        assert!(cfg.supabase.is_none());
        assert!(!cfg.recipes.is_configured());
    }

    #[test]
    fn log_level_prefers_service_variable() {
        let cfg = ServerConfig::from_env_with(env(&[
            ("RUST_LOG", "warn"),
            ("MEAL_PLANNER_LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.log_filter, "debug");
    }

    #[test]
    fn supabase_needs_url_and_key() {
        let cfg = ServerConfig::from_env_with(env(&[("SUPABASE_URL", "https://x.supabase.co")]))
            .unwrap();
        assert!(cfg.supabase.is_none());
        let cfg = ServerConfig::from_env_with(env(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_KEY", "anon"),
            ("SPOONACULAR_API_KEY", "real-key"),
        ]))
        .unwrap();
        assert!(cfg.supabase.is_some());
        assert!(cfg.recipes.is_configured());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(ServerConfig::from_env_with(env(&[("ADDRESS", "nowhere")])).is_err());
        assert!(ServerConfig::from_env_with(env(&[("REQUEST_TIMEOUT_SECS", "0")])).is_err());
        assert!(
            ServerConfig::from_env_with(env(&[("SPOONACULAR_BASE_URL", "ftp://x")])).is_err()
        );
    }
}
