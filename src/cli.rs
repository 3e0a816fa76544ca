//! Command-line interface parsing for the Pokédex CLI
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! an `EngineConfig` plus the key to load.

use chrono::Duration;
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::cache::DEFAULT_TTL_SECS;
use crate::config::{EngineConfig, DEFAULT_LANGUAGE};
use crate::data::pagination::DEFAULT_PAGE_SIZE;
use crate::data::pokeapi::POKEAPI_BASE_URL;
use crate::data::tyradex::TYRADEX_BASE_URL;
use crate::data::{ResourceKey, GENERATION_COUNT};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// Search term is empty after trimming
    #[error("Search term must not be empty")]
    EmptySearch,
}

/// Pokédex CLI - Browse PokéAPI listings and look up Pokémon
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse Pokédex pages and generations, or look up a Pokémon")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Entries per listing page
    #[arg(long, global = true, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// Cache time-to-live in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TTL_SECS)]
    pub ttl_secs: i64,

    /// Preferred language for display names
    #[arg(long, global = true, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// PokéAPI base URL
    #[arg(long, global = true, default_value = POKEAPI_BASE_URL)]
    pub pokeapi_url: String,

    /// Tyradex base URL
    #[arg(long, global = true, default_value = TYRADEX_BASE_URL)]
    pub tyradex_url: String,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show one page of the national listing
    Page {
        /// Page number, starting at 1
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Show every Pokémon of a generation
    Generation {
        /// Generation number (1-9)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=GENERATION_COUNT as i64))]
        id: u32,
    },
    /// Look up one Pokémon by name
    Search {
        /// Name (any case) or Pokédex number
        name: String,
    },
}

impl Cli {
    /// Builds the engine configuration from the parsed flags
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            pokeapi_url: self.pokeapi_url.clone(),
            tyradex_url: self.tyradex_url.clone(),
            page_size: self.page_size,
            cache_ttl: Duration::seconds(self.ttl_secs),
            language: self.language.clone(),
        }
    }

    /// The key selected by the subcommand
    pub fn resource_key(&self) -> Result<ResourceKey, CliError> {
        match &self.command {
            Command::Page { page } => Ok(ResourceKey::Page(*page)),
            Command::Generation { id } => Ok(ResourceKey::Generation(*id)),
            Command::Search { name } => ResourceKey::lookup(name).ok_or(CliError::EmptySearch),
        }
    }
}
