//! Engine configuration
//!
//! Base URLs, page size, cache TTL and preferred language, with defaults for
//! the public PokéAPI/Tyradex endpoints.

use chrono::Duration;

use crate::cache::DEFAULT_TTL_SECS;
use crate::data::pagination::DEFAULT_PAGE_SIZE;
use crate::data::pokeapi::POKEAPI_BASE_URL;
use crate::data::tyradex::TYRADEX_BASE_URL;

/// Default language for localized names
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Configuration for a navigation session
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Base URL of the listing/detail API
    pub pokeapi_url: String,
    /// Base URL of the single-resource lookup API
    pub tyradex_url: String,
    /// Entries per listing page
    pub page_size: u32,
    /// Maximum age of a cached aggregate
    pub cache_ttl: Duration,
    /// Preferred language for display names
    pub language: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pokeapi_url: POKEAPI_BASE_URL.to_string(),
            tyradex_url: TYRADEX_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            cache_ttl: Duration::seconds(DEFAULT_TTL_SECS),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl EngineConfig {
    /// Points both APIs at one base URL (used with mock servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            pokeapi_url: base_url.clone(),
            tyradex_url: base_url,
            ..Default::default()
        }
    }
}
