//! Pokédex aggregation-and-cache engine
//!
//! Fetches listings from PokéAPI, fans out to every referenced detail and
//! localization document, and caches the merged records per key for the
//! lifetime of a navigation session.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod orchestrator;
pub mod session;
pub mod state;

pub use config::EngineConfig;
pub use data::{Aggregate, DetailRecord, ResourceKey};
pub use session::Session;
pub use state::LoadState;
