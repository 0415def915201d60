use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tax_data::TaxRecordLoader;
use tax_db_sqlite::SqliteRepository;

/// Load municipal tax records from a CSV file into the database.
///
/// The CSV file should have the following columns:
/// - municipality: The municipality name (matched case-sensitively)
/// - rate: The tax rate as a decimal fraction (e.g., 0.25)
/// - start_date: First day the rate applies (YYYY-MM-DD)
/// - end_date: Last day the rate applies (YYYY-MM-DD)
#[derive(Parser, Debug)]
#[command(name = "tax-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing tax records
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database URL (e.g., sqlite:taxes.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:taxes.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    if let Some(seeds_dir) = &args.seeds {
        println!("Running seeds from: {}", seeds_dir.display());
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
        println!("Seeds complete.");
    }

    println!("Loading tax records from: {}", args.file.display());

    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let rows = TaxRecordLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} rows from CSV", rows.len());

    let inserted = TaxRecordLoader::load(&repo, &rows)
        .await
        .context("Failed to load tax records into database")?;

    println!("Successfully loaded {} tax records into the database.", inserted);

    Ok(())
}
