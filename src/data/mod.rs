//! Core data models for the Pokédex engine
//!
//! This module contains the types shared by the API clients, the cache and the
//! load state machine: resource keys, summary references and the merged,
//! display-ready records.

pub mod pagination;
pub mod pokeapi;
pub mod tyradex;

pub use pagination::{ListingParams, PaginationController};
pub use pokeapi::{Listing, PokeApiClient, PokeApiError};
pub use tyradex::{LookupError, TyradexClient};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of generation tabs offered by PokéAPI
pub const GENERATION_COUNT: u32 = 9;

/// Logical selector for one aggregate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKey {
    /// A page of the national listing (1-based)
    Page(u32),
    /// A generation (category) id
    Generation(u32),
    /// A single resource addressed by name
    Lookup(String),
}

impl ResourceKey {
    /// Builds a lookup key from user input.
    ///
    /// The name is trimmed and lowercased; blank input yields `None`.
    pub fn lookup(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            None
        } else {
            Some(ResourceKey::Lookup(name))
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::Page(page) => write!(f, "page {}", page),
            ResourceKey::Generation(id) => write!(f, "generation {}", id),
            ResourceKey::Lookup(name) => write!(f, "lookup '{}'", name),
        }
    }
}

/// Display label for a generation tab ("Generation I" .. "Generation IX")
pub fn generation_label(id: u32) -> Option<String> {
    const NUMERALS: [&str; GENERATION_COUNT as usize] =
        ["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX"];
    let index = usize::try_from(id.checked_sub(1)?).ok()?;
    NUMERALS
        .get(index)
        .map(|numeral| format!("Generation {}", numeral))
}

/// Pointer to one item's detail endpoint, as found in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRef {
    pub name: String,
    pub url: String,
}

/// Display name in the preferred language, with the source's own name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    /// Preferred-language name, or the base name when none exists
    pub primary: String,
    /// The source's own name
    pub fallback: String,
}

/// Sprite URLs for a record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprites {
    pub front: Option<String>,
    pub shiny: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    /// Icon URL, only provided by Tyradex
    pub image: Option<String>,
}

/// A base stat with its value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: u32,
}

impl Stat {
    pub fn tier(&self) -> StatTier {
        StatTier::from_value(self.value)
    }
}

/// Qualitative bucket for a base stat value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatTier {
    VeryWeak,
    Weak,
    Average,
    Good,
    VeryGood,
    Excellent,
}

impl StatTier {
    pub fn from_value(value: u32) -> Self {
        match value {
            0..=49 => StatTier::VeryWeak,
            50..=69 => StatTier::Weak,
            70..=89 => StatTier::Average,
            90..=109 => StatTier::Good,
            110..=129 => StatTier::VeryGood,
            _ => StatTier::Excellent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatTier::VeryWeak => "Very weak",
            StatTier::Weak => "Weak",
            StatTier::Average => "Average",
            StatTier::Good => "Good",
            StatTier::VeryGood => "Very good",
            StatTier::Excellent => "Excellent",
        }
    }
}

/// Damage multiplier taken from one attacking type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resistance {
    pub name: String,
    pub multiplier: f64,
}

impl Resistance {
    pub fn severity(&self) -> Effectiveness {
        if self.multiplier > 2.0 {
            Effectiveness::VeryWeak
        } else if self.multiplier > 1.0 {
            Effectiveness::Weak
        } else if self.multiplier == 0.0 {
            Effectiveness::Immune
        } else if self.multiplier < 1.0 {
            Effectiveness::Resistant
        } else {
            Effectiveness::Neutral
        }
    }
}

/// How hard an attacking type hits, seen from the defender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effectiveness {
    Immune,
    Resistant,
    Neutral,
    Weak,
    VeryWeak,
}

/// Merged, display-ready record for one Pokémon
///
/// Fields a given source does not provide are left empty: PokéAPI listings
/// carry no resistances, Tyradex lookups carry everything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// National Pokédex number
    pub id: u32,
    /// Base name in the source's default locale
    pub name: String,
    pub localized_name: LocalizedName,
    pub sprites: Sprites,
    pub types: Vec<TypeInfo>,
    pub talents: Vec<String>,
    /// Base stats in source order
    pub stats: Vec<Stat>,
    pub resistances: Vec<Resistance>,
}

/// Ordered, failure-filtered records for one key
pub type Aggregate = Vec<DetailRecord>;
