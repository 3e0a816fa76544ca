//! PokéAPI client
//!
//! Fetches listings (paged national listing and per-generation species lists)
//! and the pokemon/species documents referenced by them.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::{ListingParams, Sprites, Stat, SummaryRef, TypeInfo};

/// Base URL for PokéAPI v2
pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Errors that can occur when talking to PokéAPI
#[derive(Debug, Error)]
pub enum PokeApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Ordered references from a listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub refs: Vec<SummaryRef>,
    /// Size of the whole collection, only reported by the paged listing
    pub total_count: Option<u64>,
}

/// Client for PokéAPI listings and documents
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl Default for PokeApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PokeApiClient {
    /// Create a new PokeApiClient against the public API
    pub fn new() -> Self {
        Self::with_base_url(POKEAPI_BASE_URL)
    }

    /// Create a new PokeApiClient against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a new PokeApiClient sharing an existing HTTP client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch one page of the national listing
    pub async fn fetch_page(&self, params: ListingParams) -> Result<Listing, PokeApiError> {
        let url = format!(
            "{}/pokemon?offset={}&limit={}",
            self.base_url, params.offset, params.limit
        );
        let page: PageResponse = self.get_json(&url).await?;

        Ok(Listing {
            refs: page.results,
            total_count: Some(page.count),
        })
    }

    /// Fetch the species list of one generation
    pub async fn fetch_generation(&self, id: u32) -> Result<Listing, PokeApiError> {
        let url = format!("{}/generation/{}", self.base_url, id);
        let generation: GenerationResponse = self.get_json(&url).await?;

        Ok(Listing {
            refs: generation.pokemon_species,
            total_count: None,
        })
    }

    /// Fetch a pokemon or species document by absolute URL
    pub(crate) async fn fetch_document(&self, url: &str) -> Result<ResourceDoc, PokeApiError> {
        self.get_json(url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, PokeApiError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PokeApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Paged listing response
#[derive(Debug, Deserialize)]
struct PageResponse {
    count: u64,
    results: Vec<SummaryRef>,
}

/// Generation response, only the species list is used
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    pokemon_species: Vec<SummaryRef>,
}

/// A pokemon or species document
///
/// Both shapes share `id`/`name`; a species carries `names` and `varieties`,
/// a pokemon carries sprites, types, stats and a `species` back-reference.
#[derive(Debug, Deserialize)]
pub(crate) struct ResourceDoc {
    #[serde(default)]
    pub id: Option<u32>,
    pub name: String,
    #[serde(default)]
    pub sprites: Option<SpriteSet>,
    #[serde(default)]
    pub species: Option<UrlRef>,
    #[serde(default)]
    pub varieties: Option<Vec<Variety>>,
    #[serde(default)]
    pub names: Vec<NameEntry>,
    #[serde(default)]
    types: Vec<TypeSlot>,
    #[serde(default)]
    stats: Vec<StatSlot>,
    #[serde(default)]
    abilities: Vec<AbilitySlot>,
}

impl ResourceDoc {
    /// URL of the default variety, when this is a species document
    pub fn default_variety_url(&self) -> Option<&str> {
        self.varieties
            .as_ref()?
            .iter()
            .find(|variety| variety.is_default)
            .map(|variety| variety.pokemon.url.as_str())
    }

    pub fn sprites(&self) -> Sprites {
        self.sprites
            .as_ref()
            .map(|set| Sprites {
                front: set.front_default.clone(),
                shiny: set.front_shiny.clone(),
            })
            .unwrap_or_default()
    }

    pub fn types(&self) -> Vec<TypeInfo> {
        self.types
            .iter()
            .map(|slot| TypeInfo {
                name: slot.kind.name.clone(),
                image: None,
            })
            .collect()
    }

    pub fn stats(&self) -> Vec<Stat> {
        self.stats
            .iter()
            .map(|slot| Stat {
                name: slot.stat.name.clone(),
                value: slot.base_stat,
            })
            .collect()
    }

    pub fn talents(&self) -> Vec<String> {
        self.abilities
            .iter()
            .map(|slot| slot.ability.name.clone())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SpriteSet {
    front_default: Option<String>,
    #[serde(default)]
    front_shiny: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UrlRef {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Variety {
    is_default: bool,
    pokemon: UrlRef,
}

/// One entry of a species' localized names
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NameEntry {
    pub name: String,
    pub language: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedRef {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedRef,
}

#[derive(Debug, Deserialize)]
struct StatSlot {
    base_stat: u32,
    stat: NamedRef,
}

#[derive(Debug, Deserialize)]
struct AbilitySlot {
    ability: NamedRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Trimmed pokemon document as served by PokéAPI
    const PIKACHU_DOC: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "sprites": {
            "front_default": "https://img.example/25.png",
            "front_shiny": "https://img.example/shiny/25.png",
            "back_default": null
        },
        "species": { "name": "pikachu", "url": "https://pokeapi.co/api/v2/pokemon-species/25/" },
        "types": [ { "slot": 1, "type": { "name": "electric", "url": "https://pokeapi.co/api/v2/type/13/" } } ],
        "stats": [
            { "base_stat": 35, "effort": 0, "stat": { "name": "hp", "url": "" } },
            { "base_stat": 55, "effort": 0, "stat": { "name": "attack", "url": "" } }
        ],
        "abilities": [
            { "ability": { "name": "static", "url": "" }, "is_hidden": false, "slot": 1 },
            { "ability": { "name": "lightning-rod", "url": "" }, "is_hidden": true, "slot": 3 }
        ]
    }"#;

    /// Trimmed species document as served by PokéAPI
    const BULBASAUR_SPECIES: &str = r#"{
        "id": 1,
        "name": "bulbasaur",
        "names": [
            { "language": { "name": "ja", "url": "" }, "name": "フシギダネ" },
            { "language": { "name": "fr", "url": "" }, "name": "Bulbizarre" }
        ],
        "varieties": [
            { "is_default": false, "pokemon": { "name": "bulbasaur-gmax", "url": "https://pokeapi.co/api/v2/pokemon/10195/" } },
            { "is_default": true, "pokemon": { "name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/" } }
        ]
    }"#;

    #[test]
    fn test_parse_pokemon_document() {
        let doc: ResourceDoc = serde_json::from_str(PIKACHU_DOC).expect("Failed to parse");

        assert_eq!(doc.id, Some(25));
        assert_eq!(doc.name, "pikachu");
        assert_eq!(
            doc.species.as_ref().map(|s| s.url.as_str()),
            Some("https://pokeapi.co/api/v2/pokemon-species/25/")
        );
        assert!(doc.varieties.is_none());

        let sprites = doc.sprites();
        assert_eq!(sprites.front.as_deref(), Some("https://img.example/25.png"));
        assert_eq!(sprites.shiny.as_deref(), Some("https://img.example/shiny/25.png"));

        assert_eq!(doc.types()[0].name, "electric");
        assert_eq!(doc.talents(), vec!["static", "lightning-rod"]);

        let stats = doc.stats();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].name, "hp");
        assert_eq!(stats[0].value, 35);
    }

    #[test]
    fn test_parse_species_document() {
        let doc: ResourceDoc = serde_json::from_str(BULBASAUR_SPECIES).expect("Failed to parse");

        assert_eq!(doc.names.len(), 2);
        assert_eq!(
            doc.default_variety_url(),
            Some("https://pokeapi.co/api/v2/pokemon/1/")
        );
        assert!(doc.sprites().front.is_none());
    }

    #[test]
    fn test_default_variety_missing() {
        let doc: ResourceDoc = serde_json::from_str(
            r#"{ "name": "odd", "varieties": [ { "is_default": false, "pokemon": { "url": "x" } } ] }"#,
        )
        .expect("Failed to parse");

        assert_eq!(doc.default_variety_url(), None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = PokeApiClient::with_base_url("http://localhost:1234/");
        assert_eq!(client.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_default_points_at_public_api() {
        let client = PokeApiClient::default();
        assert_eq!(client.base_url, POKEAPI_BASE_URL);
    }

    #[tokio::test]
    async fn test_fetch_page_sends_offset_and_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/pokemon"))
            .and(query_param("offset", "300"))
            .and(query_param("limit", "150"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "count": 1302,
                "next": null,
                "previous": null,
                "results": [
                    { "name": "a", "url": "http://x/a" },
                    { "name": "b", "url": "http://x/b" }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = PokeApiClient::with_base_url(mock_server.uri());
        let listing = client
            .fetch_page(ListingParams {
                offset: 300,
                limit: 150,
            })
            .await
            .expect("Listing should succeed");

        assert_eq!(listing.total_count, Some(1302));
        assert_eq!(listing.refs.len(), 2);
        assert_eq!(listing.refs[0].name, "a");
        assert_eq!(listing.refs[1].url, "http://x/b");
    }

    #[tokio::test]
    async fn test_fetch_generation_reads_species_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/generation/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1,
                "name": "generation-i",
                "pokemon_species": [
                    { "name": "bulbasaur", "url": "http://x/species/1" }
                ]
            })))
            .mount(&mock_server)
            .await;

        let client = PokeApiClient::with_base_url(mock_server.uri());
        let listing = client.fetch_generation(1).await.expect("Listing should succeed");

        assert_eq!(listing.total_count, None);
        assert_eq!(listing.refs[0].name, "bulbasaur");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/generation/42"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let client = PokeApiClient::with_base_url(mock_server.uri());
        let result = client.fetch_generation(42).await;

        match result {
            Err(PokeApiError::Status { status, url }) => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/generation/42"));
            }
            other => panic!("Expected PokeApiError::Status, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/generation/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{ invalid json }"))
            .mount(&mock_server)
            .await;

        let client = PokeApiClient::with_base_url(mock_server.uri());
        let result = client.fetch_generation(1).await;

        assert!(matches!(result, Err(PokeApiError::ParseError(_))));
    }
}
