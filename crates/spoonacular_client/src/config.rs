use crate::RecipeError;
use crate::utils::is_placeholder_key;
use secrecy::{ExposeSecret, SecretString};

pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: Option<SecretString>,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, RecipeError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. A missing API key is not an error here: the client reports
    /// `NotConfigured` per call so the UI can show setup instructions.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, RecipeError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let api_key = get("SPOONACULAR_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::new(k.into()));
        let base_url = get("SPOONACULAR_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RecipeError::NotConfigured(format!(
                "SPOONACULAR_BASE_URL must be an http(s) URL, got {base_url}"
            )));
        }
        Ok(Self { api_key, base_url })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !is_placeholder_key(k.expose_secret()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_without_key_is_unconfigured() {
        let get = |k: &str| match k {
            "SPOONACULAR_BASE_URL" => Some("http://localhost".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert!(!cfg.is_configured());
        assert_eq!(cfg.base_url, "http://localhost");
    }

    #[test]
    fn from_env_reads_values() {
        let get = |k: &str| match k {
            "SPOONACULAR_API_KEY" => Some("sekrit".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert!(cfg.is_configured());
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn placeholder_key_is_unconfigured() {
        let get = |k: &str| match k {
            "SPOONACULAR_API_KEY" => Some("tu_api_key_aqui".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert!(!cfg.is_configured());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let get = |k: &str| match k {
            "SPOONACULAR_BASE_URL" => Some("ftp://example".into()),
            _ => None,
        };
        assert!(Config::from_env_with(get).is_err());
    }
}
