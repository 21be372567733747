use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

use mention_ingest::config::Config;
use mention_ingest::constants::{self, DEFAULT_QUERY_LIMIT};
use mention_ingest::logging;
use mention_ingest::pipeline::ingestion::{csv_import, CsvFormat, MentionMindClient, MentionQuery};
use mention_ingest::pipeline::seed::create_test_mentions;
use mention_ingest::pipeline::storage::{MentionStore, SqliteStore, TimeRange};
use mention_ingest::pipeline::{run_import, store_processed, ImportReport};

#[derive(Parser)]
#[command(name = "mention_ingest")]
#[command(about = "Normalize, enrich and store brand mentions")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the mention table and its source index
    InitStore,
    /// Import a CSV export
    ImportCsv {
        /// Export layout: review or social
        #[arg(long)]
        format: String,
        path: PathBuf,
    },
    /// Fetch mentions from the MentionMind API and store them
    Fetch {
        #[arg(long, default_value_t = 100)]
        limit: u32,
        /// YYYY-MM-DD
        #[arg(long)]
        start_date: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Store synthetic test mentions
    Seed {
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// List stored mentions for a source
    Query {
        #[arg(long)]
        source: String,
        /// YYYY-MM-DD, inclusive
        #[arg(long)]
        from: Option<String>,
        /// YYYY-MM-DD, inclusive
        #[arg(long)]
        to: Option<String>,
        #[arg(long, default_value_t = DEFAULT_QUERY_LIMIT)]
        limit: usize,
    },
    /// Delete expired mentions
    Purge,
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    SqliteStore::open(&config.store.db_path, &config.store.table_name)
        .with_context(|| format!("Failed to open mention store at {}", config.store.db_path))
}

fn day_bound(date: Option<&str>, end_of_day: bool) -> Result<Option<i64>> {
    let Some(date) = date else {
        return Ok(None);
    };
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("'{date}' is not a YYYY-MM-DD date"))?;
    let time = if end_of_day {
        day.and_hms_opt(23, 59, 59)
    } else {
        day.and_hms_opt(0, 0, 0)
    };
    Ok(time.map(|t| t.and_utc().timestamp()))
}

fn print_report(report: &ImportReport) {
    println!("\n📊 Import results for {}:", report.source);
    println!("   Total: {}", report.total);
    println!("   Processed: {}", report.processed);
    println!("   Skipped: {}", report.skipped);
    println!("   Stored: {}", report.stored);
    println!("   Failed: {}", report.failed);
    if !report.errors.is_empty() {
        warn!("{} errors encountered during import", report.errors.len());
        println!("\n⚠️  Errors encountered:");
        for error in &report.errors {
            println!("   - {}", error);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::InitStore => {
            let store = open_store(&config)?;
            store.create_table().await?;
            println!("✅ Table '{}' ready in {}", store.table_name(), config.store.db_path);
        }
        Commands::ImportCsv { format, path } => {
            let Some(csv_format) = CsvFormat::parse(&format) else {
                bail!(
                    "Unknown CSV format '{}'. Supported: {}",
                    format,
                    constants::get_supported_csv_formats().join(", ")
                );
            };
            let store = open_store(&config)?;
            store.create_table().await?;

            println!("📥 Importing {} ...", path.display());
            let outcome = csv_import::import_csv(&path, csv_format)?;
            let label = format!("{}_csv", format.to_lowercase());
            let report = store_processed(&store, &outcome, &label, config.store.ttl_days).await;
            print_report(&report);
        }
        Commands::Fetch { limit, start_date, end_date } => {
            let api_key = config.require_api_key()?;
            let client = MentionMindClient::new(api_key, &config.api)?;
            let store = open_store(&config)?;
            store.create_table().await?;

            println!("📡 Fetching mentions from MentionMind...");
            let query = MentionQuery { start_date, end_date, limit };
            let raws = match client.get_mentions(&query).await {
                Ok(raws) => raws,
                Err(e) => {
                    error!("Fetching mentions failed: {}", e);
                    return Err(e.into());
                }
            };
            let report = run_import(&store, &raws, "mentionmind_api", config.store.ttl_days).await;
            print_report(&report);
        }
        Commands::Seed { count } => {
            let store = open_store(&config)?;
            store.create_table().await?;

            println!("🌱 Importing {} test mentions...", count);
            let raws = create_test_mentions(count, Utc::now());
            let report = run_import(&store, &raws, "seed", config.store.ttl_days).await;
            print_report(&report);
        }
        Commands::Query { source, from, to, limit } => {
            let store = open_store(&config)?;
            let range = TimeRange::new(day_bound(from.as_deref(), false)?, day_bound(to.as_deref(), true)?);
            let mentions = store.query_by_source(&source, range, limit).await?;

            println!("🔎 {} mentions for {}:", mentions.len(), source);
            for mention in &mentions {
                println!("ID: {}", mention.mention_id);
                println!("Source: {}", mention.source);
                println!("Content: {}", mention.content);
                println!("---");
            }
        }
        Commands::Purge => {
            let store = open_store(&config)?;
            let removed = store.purge_expired(Utc::now().timestamp()).await?;
            info!("Purged {} expired mentions", removed);
            println!("🧹 Removed {} expired mentions", removed);
        }
    }
    Ok(())
}
