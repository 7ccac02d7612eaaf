use std::env;
use std::time::Duration;

/// How many records to over-fetch when no specific category is requested,
/// so the balancer has raw material from every sub-category.
pub const DEFAULT_BALANCE_FETCH_SIZE: u32 = 200;

/// Freshness window for cached query results.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Upper bound on one remote search call.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;

/// Gallery configuration, supplied once at construction. Provider
/// credentials and the category layout are explicit values here, not
/// ambient globals.
#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,

    /// Root folder that holds every gallery asset.
    pub root_folder: String,
    /// Recognized sub-category folder names under the root.
    pub categories: Vec<String>,

    pub cache_ttl: Duration,
    pub balance_fetch_size: u32,
    pub search_timeout: Duration,
}

impl GalleryConfig {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            cloud_name: required_env("CLOUDINARY_CLOUD_NAME"),
            api_key: required_env("CLOUDINARY_API_KEY"),
            api_secret: required_env("CLOUDINARY_API_SECRET"),
            root_folder: env::var("GALLERY_ROOT_FOLDER").unwrap_or_else(|_| "gallery".to_string()),
            categories: env::var("GALLERY_CATEGORIES")
                .map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            cache_ttl: Duration::from_secs(
                env::var("GALLERY_CACHE_TTL_SECS")
                    .unwrap_or_else(|_| DEFAULT_CACHE_TTL_SECS.to_string())
                    .parse()
                    .expect("GALLERY_CACHE_TTL_SECS must be a number"),
            ),
            balance_fetch_size: env::var("GALLERY_BALANCE_FETCH_SIZE")
                .unwrap_or_else(|_| DEFAULT_BALANCE_FETCH_SIZE.to_string())
                .parse()
                .expect("GALLERY_BALANCE_FETCH_SIZE must be a number"),
            search_timeout: Duration::from_secs(
                env::var("GALLERY_SEARCH_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_SEARCH_TIMEOUT_SECS.to_string())
                    .parse()
                    .expect("GALLERY_SEARCH_TIMEOUT_SECS must be a number"),
            ),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
