use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use webscope_ingest::IngestPipeline;
use webscope_query::{QueryEngine, QueryParams, StatsEngine};
use webscope_store::MemoryStore;

mod config;

use config::Config;

/// Webscope - ingest, query, and summarize Apache access logs
#[derive(Parser, Debug)]
#[command(name = "webscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file (defaults to ./webscope.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a log file and report how many records it yields
    Import {
        /// Access log in combined format
        file: PathBuf,
    },

    /// List records from a log file with filtering, sorting, and pagination
    Query {
        /// Access log in combined format
        file: PathBuf,

        /// Substring match against the client address
        #[arg(long)]
        ip: Option<String>,

        /// Exact status code match
        #[arg(long)]
        status: Option<String>,

        /// Inclusive lower date bound (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Inclusive upper date bound (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Sort column (ip_address, request_time, request_method,
        /// status_code, response_size)
        #[arg(long)]
        sort: Option<String>,

        /// Sort direction (asc or desc)
        #[arg(long)]
        direction: Option<String>,

        /// 1-indexed result page
        #[arg(long)]
        page: Option<String>,

        /// Rows per page (1-100)
        #[arg(long)]
        per_page: Option<String>,
    },

    /// Print aggregate statistics for a log file
    Stats {
        /// Access log in combined format
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Logging goes to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Import { file } => {
            let (_, inserted) = load_store(&config, &file)?;
            println!("{inserted} records imported");
        }
        Command::Query {
            file,
            ip,
            status,
            from,
            to,
            sort,
            direction,
            page,
            per_page,
        } => {
            let (store, _) = load_store(&config, &file)?;
            let params = QueryParams {
                ip_address: ip,
                status_code: status,
                date_from: from,
                date_to: to,
                sort_field: sort,
                sort_direction: direction,
                page,
                per_page,
            };

            let page = QueryEngine::new(store).list(&params)?;
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Command::Stats { file } => {
            let (store, _) = load_store(&config, &file)?;
            let summary = StatsEngine::new(store).summary()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

/// Ingest one file into a fresh in-memory store
fn load_store(config: &Config, file: &Path) -> Result<(MemoryStore, u64)> {
    let store = MemoryStore::new();
    let pipeline =
        IngestPipeline::new(store.clone()).with_batch_size(config.ingest.batch_size);
    let inserted = pipeline.ingest(file)?;
    Ok((store, inserted))
}
