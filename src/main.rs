//! Pokédex CLI - Browse Pokédex listings from the terminal
//!
//! Loads one page, one generation or one Pokémon through a navigation session
//! and prints the merged records.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pokedex::cli::{Cli, Command};
use pokedex::data::generation_label;
use pokedex::{DetailRecord, LoadState, Session};

/// Prints one line per record: number, localized name and base name
fn print_summary(records: &[DetailRecord]) {
    for record in records {
        println!(
            "#{:04} {} ({})",
            record.id, record.localized_name.primary, record.localized_name.fallback
        );
    }
}

/// Prints the full record of a single lookup
fn print_detail(record: &DetailRecord) {
    println!("#{:04} {}", record.id, record.localized_name.primary);

    if let Some(front) = &record.sprites.front {
        println!("  sprite: {}", front);
    }
    if let Some(shiny) = &record.sprites.shiny {
        println!("  shiny:  {}", shiny);
    }

    let types: Vec<&str> = record.types.iter().map(|t| t.name.as_str()).collect();
    println!("  types:   {}", types.join(", "));
    println!("  talents: {}", record.talents.join(", "));

    println!("  stats:");
    for stat in &record.stats {
        println!(
            "    {:<8} {:>3}  {}",
            stat.name.to_uppercase().replace('_', " "),
            stat.value,
            stat.tier().label()
        );
    }

    println!("  resistances:");
    for resistance in &record.resistances {
        println!(
            "    {:<10} x{} ({:?})",
            resistance.name,
            resistance.multiplier,
            resistance.severity()
        );
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let key = match cli.resource_key() {
        Ok(key) => key,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(&cli.engine_config());
    let state = session.load(key).await.clone();

    match state {
        LoadState::Success(_, records) => {
            if cli.json {
                match serde_json::to_string_pretty(&records) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
                return ExitCode::SUCCESS;
            }

            match &cli.command {
                Command::Page { page } => {
                    print_summary(&records);
                    if let Some(total) = session.pagination().total_pages() {
                        println!("page {}/{}", page, total);
                    }
                }
                Command::Generation { id } => {
                    if let Some(label) = generation_label(*id) {
                        println!("{}", label);
                    }
                    print_summary(&records);
                }
                Command::Search { .. } => {
                    for record in &records {
                        print_detail(record);
                    }
                }
            }
            ExitCode::SUCCESS
        }
        LoadState::Error(key, message) => {
            eprintln!("Error loading {}: {}", key, message);
            ExitCode::FAILURE
        }
        LoadState::Idle | LoadState::Loading(_) => {
            eprintln!("Error: load did not complete");
            ExitCode::FAILURE
        }
    }
}
