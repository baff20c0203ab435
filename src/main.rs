mod bestiary;
mod notion;
mod parser;
mod render;
mod settings;

use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use notion::error::NotionError;
use notion::NotionClient;
use settings::Settings;

#[derive(Parser)]
#[command(name = "notion_bestiary", about = "Monster statblocks from a Notion database")]
struct Cli {
    /// Notion integration token (overrides NOTION_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one monster page and print its statblock
    Fetch {
        /// Page ID or Notion page URL
        page: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Find monsters by (partial) name
    Search {
        /// Substring of the monster name; omit to list the first 50
        query: Option<String>,
        /// Database ID or URL (overrides NOTION_DATABASE_ID)
        #[arg(short, long)]
        database: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Search, then fetch every match as a JSON array
    Bestiary {
        query: Option<String>,
        #[arg(short, long)]
        database: Option<String>,
        /// Pages fetched at once
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            // bad input exits 2, upstream trouble exits 1
            let bad_input = e
                .downcast_ref::<NotionError>()
                .is_some_and(NotionError::is_validation);
            ExitCode::from(if bad_input { 2 } else { 1 })
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let t0 = Instant::now();
    let settings = Settings::load().context("Failed to load settings")?;

    match cli.command {
        Commands::Fetch { page, json } => {
            let settings = settings.override_with(cli.api_key, None, None);
            let client = client(&settings)?;
            let stat_block = client
                .fetch_stat_block(&page)
                .await
                .context("Failed to fetch monster data")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stat_block)?);
            } else {
                print!("{}", render::stat_block(&stat_block));
            }
        }
        Commands::Search { query, database, json } => {
            let settings = settings.override_with(cli.api_key, database, None);
            let client = client(&settings)?;
            let hits = client
                .search(settings.database_id.as_deref().unwrap_or_default(), query.as_deref())
                .await
                .context("Search failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else if hits.is_empty() {
                println!("No monsters found.");
            } else {
                print!("{}", render::search_table(&hits));
                println!("\n{} monsters", hits.len());
            }
        }
        Commands::Bestiary { query, database, concurrency } => {
            let settings = settings.override_with(cli.api_key, database, concurrency);
            let client = client(&settings)?;
            let hits = client
                .search(settings.database_id.as_deref().unwrap_or_default(), query.as_deref())
                .await
                .context("Search failed")?;
            let (entries, stats) =
                bestiary::fetch_all(&client, hits, settings.concurrency).await?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
            eprintln!(
                "Done: {} monsters ({} ok, {} errors) in {:.1}s",
                stats.total,
                stats.ok,
                stats.errors,
                t0.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}

fn client(settings: &Settings) -> anyhow::Result<NotionClient> {
    NotionClient::new(
        settings.api_key.as_deref().unwrap_or_default(),
        &settings.api_url,
        &settings.version,
    )
    .context("Set NOTION_API_KEY or pass --api-key")
}
