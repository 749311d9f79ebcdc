//! heroes - browse the superhero catalog from the terminal.
//!
//! A thin consumer of `heroes-core`: it wires the repository to the public
//! dataset (or an empty offline catalog) and prints what it gets back.

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use heroes_core::models::{Hero, HeroCreate, HeroPatch};
use heroes_core::utils::truncate;
use heroes_core::{ApiClient, Config, HeroRepository, StaticSource};

// ============================================================================
// Constants
// ============================================================================

const NAME_WIDTH: usize = 24;
const PUBLISHER_WIDTH: usize = 18;

#[derive(Debug, Parser)]
#[command(name = "heroes", version, about = "Browse the superhero catalog")]
struct Cli {
    /// Start from an empty catalog instead of fetching the dataset
    #[arg(long)]
    offline: bool,

    /// Disable the simulated response latency
    #[arg(long)]
    no_latency: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List heroes in catalog order
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Find heroes whose name contains a term
    Search { term: String },
    /// Show a single hero
    Show {
        id: i64,
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a short create/update/delete session against the catalog
    Demo,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Config {
    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    }
    .with_env_overrides();

    if cli.offline {
        config.offline = true;
    }
    if cli.no_latency {
        config.read_latency_ms = 0;
        config.write_latency_ms = 0;
    }
    config
}

fn build_repository(config: &Config) -> Result<HeroRepository> {
    let repo_config = config.repository_config();
    if config.offline {
        info!("Offline mode, starting with an empty catalog");
        return Ok(HeroRepository::new(StaticSource::empty(), repo_config));
    }

    let client = ApiClient::with_base_url(&config.api_base_url, config.request_timeout())?;
    Ok(HeroRepository::new(client, repo_config))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli);
    let repo = build_repository(&config)?;

    let summary = repo.load().await;
    if let Some(ref error) = summary.error {
        eprintln!("Catalog unavailable ({}), continuing with local heroes only", error);
    }

    match cli.command {
        Command::List { limit } => {
            let heroes = repo.get_all().await;
            print_table(heroes.iter().take(limit));
            println!("{} of {} heroes", limit.min(heroes.len()), heroes.len());
        }
        Command::Search { term } => {
            // Blank searches list everything
            let heroes = if term.trim().is_empty() {
                repo.get_all().await
            } else {
                repo.search_by_name(term.trim()).await
            };
            print_table(heroes.iter());
            println!("{} matches", heroes.len());
        }
        Command::Show { id, json } => match repo.get_by_id(id).await {
            Some(hero) if json => {
                let out = serde_json::to_string_pretty(&hero).context("Failed to serialize hero")?;
                println!("{}", out);
            }
            Some(hero) => print_details(&hero),
            None => println!("No hero with id {}", id),
        },
        Command::Demo => run_demo(&repo).await,
    }

    Ok(())
}

fn print_table<'a>(heroes: impl Iterator<Item = &'a Hero>) {
    println!(
        "{:>6}  {:<name$}  {:<publisher$}  {:>5}",
        "ID",
        "NAME",
        "PUBLISHER",
        "POWER",
        name = NAME_WIDTH,
        publisher = PUBLISHER_WIDTH
    );
    for hero in heroes {
        println!(
            "{:>6}  {:<name$}  {:<publisher$}  {:>5}",
            hero.id,
            truncate(&hero.name, NAME_WIDTH),
            truncate(hero.publisher(), PUBLISHER_WIDTH),
            hero.powerstats.total(),
            name = NAME_WIDTH,
            publisher = PUBLISHER_WIDTH
        );
    }
}

fn print_details(hero: &Hero) {
    let bio = &hero.biography;
    let stats = &hero.powerstats;

    println!("{} (#{})", hero.name, hero.id);
    println!("  Full name:        {}", bio.full_name);
    println!("  Publisher:        {}", bio.publisher);
    println!("  Alignment:        {}", bio.alignment);
    println!("  First appearance: {}", bio.first_appearance);
    if !bio.aliases.is_empty() {
        println!("  Aliases:          {}", bio.aliases.join(", "));
    }
    println!("  Occupation:       {}", hero.work.occupation);
    println!(
        "  Height / weight:  {} / {}",
        hero.appearance.height.join(", "),
        hero.appearance.weight.join(", ")
    );
    println!(
        "  Powerstats:       INT {} STR {} SPD {} DUR {} POW {} CMB {} (avg {:.1})",
        stats.intelligence,
        stats.strength,
        stats.speed,
        stats.durability,
        stats.power,
        stats.combat,
        stats.average()
    );
    println!("  Image:            {}", hero.images.md);
}

async fn run_demo(repo: &HeroRepository) {
    let before = repo.get_all().await.len();
    println!("Catalog has {} heroes", before);

    let flash = repo
        .create(
            HeroCreate::new("Flash")
                .with_publisher("DC Comics")
                .with_occupation("Forensic Scientist"),
        )
        .await;
    println!("Created {} with id {}", flash.name, flash.id);

    let first = repo.get_all().await.into_iter().next();
    println!(
        "First in catalog: {}",
        first.map(|h| h.name).unwrap_or_else(|| "-".to_string())
    );

    if let Some(updated) = repo.update(flash.id, HeroPatch::name("The Flash")).await {
        println!("Renamed to {}", updated.name);
    }

    let found = repo.search_by_name("flash").await;
    println!("Search 'flash' finds {} hero(es)", found.len());

    let deleted = repo.delete(flash.id).await;
    println!("Deleted: {}", deleted);
    println!("Lookup after delete: {:?}", repo.get_by_id(flash.id).await.map(|h| h.name));
    println!("Deleting again: {}", repo.delete(flash.id).await);

    println!("Catalog has {} heroes", repo.len().await);
}
