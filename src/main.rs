//! Binary entry point for skillpath.
//!
//! This binary provides the CLI interface for the skillpath learning
//! tracker engine.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print to stdout/stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use skillpath::config::Config;
use skillpath::observability::{self, InitOptions};
use skillpath::storage::SqliteStore;
use skillpath::{
    Catalog, EntryId, EntrySource, EntryStatus, IngestService, ReviewService, SubmitOutcome,
    SubmitRequest, classify,
};

/// Skillpath - classify browsing history against a skill roadmap.
#[derive(Parser)]
#[command(name = "skillpath")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "SKILLPATH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Classify a title/URL pair without persisting anything.
    Classify {
        /// The page title.
        title: String,

        /// The visited URL.
        url: String,
    },

    /// Submit a visit candidate for classification and storage.
    Submit {
        /// The page title.
        title: String,

        /// The visited URL.
        url: String,

        /// Visit time (RFC 3339); defaults to now.
        #[arg(long)]
        visited_at: Option<DateTime<Utc>>,

        /// Seconds spent on the page.
        #[arg(long, default_value = "0")]
        visit_seconds: u32,

        /// Total video length in seconds.
        #[arg(long, default_value = "0")]
        video_seconds: u32,

        /// Watched video length in seconds.
        #[arg(long, default_value = "0")]
        watched_seconds: u32,

        /// Entry source: extension, manual, or import.
        #[arg(long, default_value = "manual")]
        source: String,
    },

    /// List entries, newest first.
    List {
        /// Filter by status: pending, approved, or rejected.
        #[arg(short, long)]
        status: Option<String>,

        /// Maximum number of entries.
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Approve pending entries and attach them to the roadmap.
    Approve {
        /// Entry ids to approve.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Reject pending entries.
    Reject {
        /// Entry ids to reject.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Re-run cross-referencing for an entry.
    CrossReference {
        /// Entry id.
        id: String,
    },

    /// Print the roadmap with up-to-date progress.
    Roadmap,

    /// Mark a roadmap topic as completed.
    Complete {
        /// Topic id.
        topic_id: String,
    },

    /// Show entry counts and per-topic progress.
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    observability::init(InitOptions {
        verbose: cli.verbose,
    });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::new(),
    };

    match cli.command {
        Commands::Classify { title, url } => {
            let result = classify(&title, &url);
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        },
        Commands::Submit {
            title,
            url,
            visited_at,
            visit_seconds,
            video_seconds,
            watched_seconds,
            source,
        } => {
            let source = EntrySource::parse(&source)
                .with_context(|| format!("unknown source '{source}'"))?;
            let store = open_store(&config)?;
            let ingest = IngestService::new(store, config.cache_capacity);
            let outcome = ingest.submit(SubmitRequest {
                title,
                url,
                visited_at,
                visit_seconds,
                video_seconds,
                watched_seconds,
                source,
                notes: None,
            })?;
            match outcome {
                SubmitOutcome::Created(entry) => {
                    println!("created {} (confidence {})", entry.id, entry.confidence);
                },
                SubmitOutcome::Discarded { reason } => {
                    println!("discarded: {reason}");
                },
            }
            Ok(())
        },
        Commands::List { status, limit } => {
            let status = status
                .map(|s| EntryStatus::parse(&s).with_context(|| format!("unknown status '{s}'")))
                .transpose()?;
            let review = review_service(&config)?;
            for entry in review.list(status, limit)? {
                println!(
                    "{}  [{}] {:>3}  {}  {}",
                    entry.id, entry.status, entry.confidence, entry.primary_topic, entry.title
                );
            }
            Ok(())
        },
        Commands::Approve { ids } => {
            let review = review_service(&config)?;
            let report = review.approve(&to_entry_ids(&ids))?;
            print_report("approved", &report);
            Ok(())
        },
        Commands::Reject { ids } => {
            let review = review_service(&config)?;
            let report = review.reject(&to_entry_ids(&ids))?;
            print_report("rejected", &report);
            Ok(())
        },
        Commands::CrossReference { id } => {
            let review = review_service(&config)?;
            match review.cross_reference_entry(&EntryId::new(id))? {
                Some(matched) => println!(
                    "matched topic '{}'{} with confidence {}",
                    matched.topic_name,
                    matched
                        .subtopic_name
                        .as_deref()
                        .map(|s| format!(" / '{s}'"))
                        .unwrap_or_default(),
                    matched.confidence
                ),
                None => println!("no topic assigned"),
            }
            Ok(())
        },
        Commands::Roadmap => {
            let review = review_service(&config)?;
            let roadmap = review.roadmap_view()?;
            println!("{}", serde_json::to_string_pretty(&roadmap)?);
            Ok(())
        },
        Commands::Complete { topic_id } => {
            let review = review_service(&config)?;
            review.complete_topic(&topic_id)?;
            println!("completed {topic_id}");
            Ok(())
        },
        Commands::Stats => {
            let review = review_service(&config)?;
            let stats = review.stats()?;
            println!(
                "entries: {} pending, {} approved, {} rejected",
                stats.counts.pending, stats.counts.approved, stats.counts.rejected
            );
            for topic in &stats.topics {
                println!(
                    "{:>3}%  [{}] {} ({} entries)",
                    topic.progress, topic.status, topic.name, topic.entries
                );
            }
            Ok(())
        },
    }
}

fn load_catalog(config: &Config) -> anyhow::Result<Arc<Catalog>> {
    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("loading catalog from {}", path.display()))?,
        None => Catalog::builtin().context("loading built-in catalog")?,
    };
    Ok(Arc::new(catalog))
}

fn open_store(config: &Config) -> anyhow::Result<Arc<SqliteStore>> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;
    let store = SqliteStore::open(&config.database_path())
        .with_context(|| format!("opening database {}", config.database_path().display()))?;
    Ok(Arc::new(store))
}

fn review_service(
    config: &Config,
) -> anyhow::Result<ReviewService<Arc<SqliteStore>, Arc<SqliteStore>>> {
    let catalog = load_catalog(config)?;
    let store = open_store(config)?;
    Ok(ReviewService::new(
        Arc::clone(&store),
        store,
        catalog,
        config.user_id.clone(),
    ))
}

fn to_entry_ids(ids: &[String]) -> Vec<EntryId> {
    ids.iter().map(|id| EntryId::new(id.as_str())).collect()
}

fn print_report(verb: &str, report: &skillpath::ApproveReport) {
    println!("{verb}: {}", report.processed.len());
    for error in &report.errors {
        eprintln!("  {}: {}", error.entry_id, error.message);
    }
}
