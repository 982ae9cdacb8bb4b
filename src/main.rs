use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use food_catalog::pipeline::{self, LOCAL_FOODS_FILE, MASTER_FILE, MISSING_MATCHES_FILE};
use food_catalog::{PipelineConfig, TracingObserver, VERSION};

#[derive(Parser)]
#[command(name = "food-catalog", version = VERSION, about = "Build a categorized, deduplicated food catalog")]
struct Cli {
    /// TOML config (default: ./food-catalog.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Match the whitelist against SR Legacy and write local foods
    Extract,
    /// Assign USDA categories to the survey-food collections
    Categorize,
    /// Categorize, merge all collections, and print the summary
    Merge,
    /// Extract followed by merge
    Run,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("food_catalog=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Extract => run_extract(&config)?,
        Command::Categorize => {
            pipeline::run_categorize(&config, &TracingObserver)?;
        }
        Command::Merge => run_merge(&config)?,
        Command::Run => {
            run_extract(&config)?;
            run_merge(&config)?;
        }
    }

    Ok(())
}

fn run_extract(config: &PipelineConfig) -> Result<()> {
    println!("🔎 Whitelist Extraction");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let outcome = pipeline::run_extract(config, &TracingObserver)?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total foods matched:     {}", outcome.records.len());
    println!("Missing matches:         {}", outcome.missing.len());
    println!("Output file:             {:?}", config.paths.output(LOCAL_FOODS_FILE));
    println!("Missing items log:       {:?}", config.paths.output(MISSING_MATCHES_FILE));

    if !outcome.missing.is_empty() {
        println!("\nFirst 10 missing items:");
        for item in outcome.missing.iter().take(10) {
            println!("  - {}", item);
        }
    }

    Ok(())
}

fn run_merge(config: &PipelineConfig) -> Result<()> {
    println!("🗂️  USDA Categories + Master Merge");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let summary = pipeline::run_merge(config, &TracingObserver)?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("SUMMARY");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    print!("{}", summary.render());
    println!("\n✅ Master file saved to: {:?}", config.paths.output(MASTER_FILE));

    Ok(())
}
