//! Helpers for category keywords, credentials and recipe URLs.

/// Keys shipped in sample env files; treated as "no key".
const PLACEHOLDER_KEYS: &[&str] = &["tu_api_key_aqui", "your_api_key_here", "changeme"];

/// Normalize a comma-separated keyword list: trim each entry, drop empty ones
/// and join without spaces. Returns `None` when nothing is left.
///
/// `" oatmeal , fruits,, "` becomes `"oatmeal,fruits"`.
pub fn join_categories(raw: &str) -> Option<String> {
    let joined = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if joined.is_empty() { None } else { Some(joined) }
}

pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || PLACEHOLDER_KEYS.iter().any(|p| p.eq_ignore_ascii_case(key))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ImageSize {
    fn dimensions(self) -> &'static str {
        match self {
            ImageSize::Small => "100x100",
            ImageSize::Medium => "312x231",
            ImageSize::Large => "556x370",
        }
    }
}

pub fn recipe_image_url(recipe_id: u64, size: ImageSize) -> String {
    format!(
        "https://spoonacular.com/recipeImages/{}-{}.jpg",
        recipe_id,
        size.dimensions()
    )
}

pub fn recipe_page_url(recipe_id: u64) -> String {
    format!("https://spoonacular.com/recipes/{recipe_id}")
}
