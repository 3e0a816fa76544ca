//! Fetch-and-merge pipeline for one resource key
//!
//! A listing is fetched first; every referenced item is then resolved
//! concurrently (detail document, then the dependent localization document),
//! and the results are joined in listing order. A failing item is dropped with
//! a warning, a failing listing fails the whole key.

use futures::future::join_all;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::data::pokeapi::{NameEntry, ResourceDoc};
use crate::data::pagination::compute_offset;
use crate::data::{
    Aggregate, DetailRecord, ListingParams, LocalizedName, LookupError, PokeApiClient,
    PokeApiError, ResourceKey, SummaryRef, TyradexClient,
};

/// Fatal errors: no aggregate can be produced for the key
#[derive(Debug, Error)]
pub enum LoadError {
    /// Listing endpoint unreachable, non-success or malformed
    #[error("Failed to fetch listing: {0}")]
    Summary(#[from] PokeApiError),

    /// Page numbers start at 1
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    /// Single-resource lookup failed
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Recoverable errors: the item is dropped from its aggregate
#[derive(Debug, Error)]
pub enum ItemError {
    /// Detail or localization fetch failed
    #[error(transparent)]
    Fetch(#[from] PokeApiError),

    /// Species document without a default variety
    #[error("No default variety for '{0}'")]
    NoDefaultVariant(String),

    /// Document lacks the fields a record needs
    #[error("Malformed document for '{0}': {1}")]
    Malformed(String, &'static str),
}

/// Result of one successful orchestration
#[derive(Debug, Clone)]
pub struct Assembled {
    pub records: Aggregate,
    /// Collection size reported by the paged listing
    pub total_count: Option<u64>,
}

/// Runs the listing → detail → localization pipeline
#[derive(Debug, Clone)]
pub struct RequestOrchestrator {
    pokeapi: PokeApiClient,
    tyradex: TyradexClient,
    language: String,
}

impl RequestOrchestrator {
    pub fn new(pokeapi: PokeApiClient, tyradex: TyradexClient, language: impl Into<String>) -> Self {
        Self {
            pokeapi,
            tyradex,
            language: language.into(),
        }
    }

    /// Builds both clients from the configuration, sharing one HTTP client
    pub fn from_config(config: &EngineConfig) -> Self {
        let client = Client::new();
        Self::new(
            PokeApiClient::with_client(client.clone(), &config.pokeapi_url),
            TyradexClient::with_client(client, &config.tyradex_url),
            &config.language,
        )
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Produces the aggregate for `key`
    ///
    /// # Arguments
    /// * `key` - Page, generation or lookup key
    /// * `page_size` - Listing limit, only used for `Page` keys
    ///
    /// # Returns
    /// * `Ok(Assembled)` - Records in listing order, failed items omitted
    /// * `Err(LoadError)` - The listing (or the lookup) failed
    pub async fn assemble(&self, key: &ResourceKey, page_size: u32) -> Result<Assembled, LoadError> {
        match key {
            ResourceKey::Page(page) => {
                let offset = compute_offset(*page, page_size).ok_or(LoadError::InvalidPage(*page))?;
                let listing = self
                    .pokeapi
                    .fetch_page(ListingParams {
                        offset,
                        limit: page_size,
                    })
                    .await?;
                info!(page, items = listing.refs.len(), "fetched listing page");

                Ok(Assembled {
                    records: self.resolve_items(&listing.refs).await,
                    total_count: listing.total_count,
                })
            }
            ResourceKey::Generation(id) => {
                let listing = self.pokeapi.fetch_generation(*id).await?;
                info!(generation = id, items = listing.refs.len(), "fetched generation");

                Ok(Assembled {
                    records: self.resolve_items(&listing.refs).await,
                    total_count: None,
                })
            }
            ResourceKey::Lookup(name) => {
                let record = self.lookup(name).await?;
                Ok(Assembled {
                    records: vec![record],
                    total_count: None,
                })
            }
        }
    }

    /// Single-resource lookup, no listing stage
    pub async fn lookup(&self, name: &str) -> Result<DetailRecord, LookupError> {
        self.tyradex.lookup(name, &self.language).await
    }

    /// Resolves every reference concurrently and keeps the successes in input order
    pub async fn resolve_items(&self, refs: &[SummaryRef]) -> Aggregate {
        let attempts = join_all(refs.iter().map(|summary| self.resolve_item(summary))).await;

        refs.iter()
            .zip(attempts)
            .filter_map(|(summary, attempt)| match attempt {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(item = %summary.name, error = %e, "dropping item");
                    None
                }
            })
            .collect()
    }

    /// Resolves one listing entry into a record
    ///
    /// The referenced document is either a pokemon (core fields, with a
    /// `species` link to its localized names) or a species (localized names,
    /// with `varieties` pointing at the default pokemon).
    async fn resolve_item(&self, summary: &SummaryRef) -> Result<DetailRecord, ItemError> {
        let doc = self.pokeapi.fetch_document(&summary.url).await?;
        let species_url = doc.species.as_ref().map(|species| species.url.clone());

        let (pokemon, names) = if doc.varieties.is_some() {
            let url = doc
                .default_variety_url()
                .ok_or_else(|| ItemError::NoDefaultVariant(summary.name.clone()))?;
            let pokemon = self.pokeapi.fetch_document(url).await?;
            (pokemon, doc.names)
        } else if let Some(url) = species_url {
            let species = self.pokeapi.fetch_document(&url).await?;
            (doc, species.names)
        } else {
            return Err(ItemError::Malformed(
                summary.name.clone(),
                "neither varieties nor species",
            ));
        };

        merge_record(pokemon, &names, &self.language)
            .ok_or_else(|| ItemError::Malformed(summary.name.clone(), "missing id"))
    }
}

/// Display names are always available in this locale
const SOURCE_LANGUAGE: &str = "en";

/// Picks the preferred-language name, falling back to the base name
///
/// `fallback` is the English display name, or the base name when the
/// localization payload has no English entry either.
pub(crate) fn localize(names: &[NameEntry], language: &str, base_name: &str) -> LocalizedName {
    let find = |language: &str| names.iter().find(|entry| entry.language.name == language);

    let primary = match find(language) {
        Some(entry) => entry.name.clone(),
        None => {
            debug!(name = base_name, language, "no localized name, using base name");
            base_name.to_string()
        }
    };

    LocalizedName {
        primary,
        fallback: find(SOURCE_LANGUAGE)
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| base_name.to_string()),
    }
}

/// Builds the record; `None` when the document has no usable id
fn merge_record(pokemon: ResourceDoc, names: &[NameEntry], language: &str) -> Option<DetailRecord> {
    let id = pokemon.id.filter(|id| *id != 0)?;

    Some(DetailRecord {
        id,
        localized_name: localize(names, language, &pokemon.name),
        sprites: pokemon.sprites(),
        types: pokemon.types(),
        talents: pokemon.talents(),
        stats: pokemon.stats(),
        resistances: Vec::new(),
        name: pokemon.name,
    })
}
