//! Headless runner for the review-table actions.
//!
//! ```bash
//! card-review archive 12 13
//! card-review --cards cards.json --schema schema.json --event "Fall 2024" export 12 13
//! card-review --api-url http://review.internal:8000 move 12
//! ```

use anyhow::{bail, Result};
use card_review::snapshot::{load_schema, SnapshotRefresher};
use card_review::{
    ActionContext, ActionOutcome, ApiConfig, ConsoleNotifier, DirectoryEmitter, EventContext,
    FieldSchema, HttpCardsApi, ReviewActions,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "card-review", version, about)]
struct Cli {
    /// Review API base URL (default: $REVIEW_API_URL, then http://localhost:8000)
    #[arg(long)]
    api_url: Option<String>,

    /// JSON array of cards used for exports and reloaded after each action
    #[arg(long)]
    cards: Option<PathBuf>,

    /// JSON object of field id to column label, in column order
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Review event label written into the export's first column
    #[arg(long)]
    event: Option<String>,

    /// Directory for exported CSV files (default: the download directory)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Archive the given cards
    Archive { ids: Vec<String> },
    /// Mark the given cards as exported without writing a file
    MarkExported { ids: Vec<String> },
    /// Write a CSV of the given cards and mark them exported
    Export { ids: Vec<String> },
    /// Delete the given cards
    Delete { ids: Vec<String> },
    /// Move the given cards to reviewed, one at a time
    Move { ids: Vec<String> },
}

impl Cli {
    /// Rejects flag combinations the selected command cannot work with.
    fn validate(&self) -> Result<()> {
        // Export rows come from --cards; without it the CSV is header-only.
        if matches!(self.command, Command::Export { .. }) && self.cards.is_none() {
            bail!("export needs --cards so the CSV has rows for the selected cards");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.api_url {
        Some(url) => ApiConfig::new(url)?,
        None => ApiConfig::from_env()?,
    };

    let refresher = SnapshotRefresher::load(cli.cards.clone())?;
    let cards = refresher.cards().await;
    let schema = match &cli.schema {
        Some(path) => load_schema(path)?,
        None => FieldSchema::new(),
    };
    let event = EventContext::new(cli.event.as_deref());
    let emitter = match &cli.out {
        Some(dir) => DirectoryEmitter::new(dir),
        None => DirectoryEmitter::downloads(),
    };
    let notifier = ConsoleNotifier;

    let ctx = ActionContext {
        notifier: &notifier,
        refresher: &refresher,
        emitter: &emitter,
        event: &event,
        schema: &schema,
        cards: &cards,
    };
    let actions = ReviewActions::new(HttpCardsApi::new(&config));
    tracing::info!(base_url = actions.api().base_url(), "using review API");

    let outcome = match &cli.command {
        Command::Archive { ids } => actions.archive_selected(&ctx, ids).await,
        Command::MarkExported { ids } => actions.mark_exported_selected(&ctx, ids).await,
        Command::Export { ids } => actions.export_selected(&ctx, ids).await,
        Command::Delete { ids } => actions.delete_selected(&ctx, ids).await,
        Command::Move { ids } => actions.move_selected(&ctx, ids).await,
    };

    if cli.cards.is_some() {
        tracing::info!(cards = refresher.cards().await.len(), "cards after action");
    }

    if !matches!(outcome, ActionOutcome::Succeeded { .. }) {
        std::process::exit(1);
    }

    Ok(())
}
