//! Tyradex single-resource lookup client
//!
//! Resolves one Pokémon by name against the Tyradex API, which serves the
//! French-first record used by the search view: sprites, types with icons,
//! talents, base stats and type resistances.

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use super::{DetailRecord, LocalizedName, Resistance, Sprites, Stat, TypeInfo};

/// Base URL for the Tyradex API
pub const TYRADEX_BASE_URL: &str = "https://tyradex.app/api/v1";

/// Errors that can occur on a single-resource lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// No resource with that name
    #[error("No Pokémon named '{0}'")]
    NotFound(String),

    /// Server answered with another non-success status
    #[error("Unexpected status {status} looking up '{name}'")]
    Status { status: u16, name: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Response parsed but does not describe a Pokémon
    #[error("Invalid Pokémon data: {0}")]
    Malformed(String),

    /// Base URL cannot carry a lookup path
    #[error("Invalid base URL '{0}'")]
    InvalidUrl(String),
}

/// Client for the Tyradex lookup endpoint
#[derive(Debug, Clone)]
pub struct TyradexClient {
    client: Client,
    base_url: String,
}

impl Default for TyradexClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TyradexClient {
    pub fn new() -> Self {
        Self::with_base_url(TYRADEX_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Look up one Pokémon by (normalized) name
    ///
    /// # Arguments
    /// * `name` - Lowercased, trimmed name or Pokédex number
    /// * `language` - Preferred language for the display name ("fr", "en", "jp")
    ///
    /// # Returns
    /// * `Ok(DetailRecord)` - The merged record
    /// * `Err(LookupError)` - Not found, bad status or unusable payload
    pub async fn lookup(&self, name: &str, language: &str) -> Result<DetailRecord, LookupError> {
        let url = self.lookup_url(name)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                name: name.to_string(),
            });
        }

        let text = response.text().await?;
        let payload: LookupResponse = serde_json::from_str(&text)?;

        parse_lookup(payload, name, language)
    }

    /// `{base}/pokemon/{name}`, with `name` encoded as a single path segment
    fn lookup_url(&self, name: &str) -> Result<Url, LookupError> {
        let invalid = || LookupError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("pokemon")
            .push(name);
        Ok(url)
    }
}

/// Turns a Tyradex payload into a record
///
/// A missing or zero `pokedex_id` marks an error payload, not a Pokémon.
fn parse_lookup(
    payload: LookupResponse,
    key: &str,
    language: &str,
) -> Result<DetailRecord, LookupError> {
    let id = match payload.pokedex_id {
        Some(id) if id > 0 => id,
        _ => return Err(LookupError::Malformed("missing pokedex_id".to_string())),
    };

    let names = payload.name.unwrap_or_default();
    let base_name = names
        .get("en")
        .cloned()
        .flatten()
        .unwrap_or_else(|| key.to_string());
    let primary = names
        .get(language)
        .cloned()
        .flatten()
        .unwrap_or_else(|| base_name.clone());

    let sprites = payload
        .sprites
        .map(|set| Sprites {
            front: set.regular,
            shiny: set.shiny,
        })
        .unwrap_or_default();

    let types = payload
        .types
        .unwrap_or_default()
        .into_iter()
        .map(|t| TypeInfo {
            name: t.name,
            image: t.image,
        })
        .collect();

    let talents = payload
        .talents
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.name)
        .collect();

    // serde_json is built with preserve_order, so stats keep the source order
    let stats = payload
        .stats
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| {
            let value = u32::try_from(value.as_u64()?).ok()?;
            Some(Stat { name, value })
        })
        .collect();

    let resistances = payload
        .resistances
        .unwrap_or_default()
        .into_iter()
        .map(|r| Resistance {
            name: r.name,
            multiplier: r.multiplier,
        })
        .collect();

    Ok(DetailRecord {
        id,
        name: base_name.clone(),
        localized_name: LocalizedName {
            primary,
            fallback: base_name,
        },
        sprites,
        types,
        talents,
        stats,
        resistances,
    })
}

/// Tyradex pokemon response
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    pokedex_id: Option<u32>,
    #[serde(default)]
    name: Option<HashMap<String, Option<String>>>,
    #[serde(default)]
    sprites: Option<LookupSprites>,
    #[serde(default)]
    types: Option<Vec<LookupType>>,
    #[serde(default)]
    talents: Option<Vec<LookupTalent>>,
    #[serde(default)]
    stats: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    resistances: Option<Vec<LookupResistance>>,
}

#[derive(Debug, Deserialize)]
struct LookupSprites {
    regular: Option<String>,
    #[serde(default)]
    shiny: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupType {
    name: String,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupTalent {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LookupResistance {
    name: String,
    multiplier: f64,
}
