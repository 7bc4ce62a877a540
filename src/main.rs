use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mdsearch::api::{create_router, AppState};
use mdsearch::{build_index, count_characters, ArchiveFetcher, Config, ReaderClient, SearchOptions};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "TF-IDF search over markdown documentation archives", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download and extract the documentation archive
    Fetch,

    /// Index the archive and search it
    Search {
        query: String,

        #[arg(short = 'n', long)]
        num_results: Option<usize>,

        /// Exact-match filter as field=value (repeatable)
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },

    /// Serve search and tools over HTTP
    Serve {
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Count the characters in a string
    Count { text: String },

    /// Fetch a page as text through the reader proxy
    Download { url: String },
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected field=value, got '{}'", raw))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "mdsearch=debug" } else { "mdsearch=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Fetch => {
            let fetcher = ArchiveFetcher::new(
                &config.data_dir,
                config.archive_file.clone(),
                config.extracted_dir.clone(),
            );
            let path = fetcher.fetch(&config.archive_url).await?;
            println!("{}", path.display());
        }
        Command::Search {
            query,
            num_results,
            filters,
        } => {
            let start = Instant::now();
            let index = build_index(&config).await?;
            tracing::info!("Index ready in {:?}", start.elapsed());

            let mut options = SearchOptions::with_limit(num_results.unwrap_or(config.num_results));
            options.filters = filters.into_iter().collect();

            let results = index.search(&query, &options)?;

            println!("Found {} results for \"{}\":", results.len(), query);
            println!();
            for (i, hit) in results.iter().enumerate() {
                println!("{}. {}", i + 1, hit.get("filename").unwrap_or("<unnamed>"));
                println!("   Score: {:.4}", hit.score);
            }

            match results.first() {
                Some(first) => {
                    println!();
                    println!("First result: {}", first.get("filename").unwrap_or("<unnamed>"));
                }
                None => println!("No results found"),
            }
        }
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.bind.clone());
            let index = build_index(&config).await?;

            let state = Arc::new(AppState {
                index,
                reader: ReaderClient::new(config.reader_prefix.clone()),
                default_results: config.num_results,
            });

            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("Failed to bind {}", bind))?;
            tracing::info!("Listening on {}", bind);
            axum::serve(listener, create_router(state)).await?;
        }
        Command::Count { text } => {
            println!("{}", count_characters(&text));
        }
        Command::Download { url } => {
            if url.is_empty() {
                bail!("url must not be empty");
            }
            let reader = ReaderClient::new(config.reader_prefix.clone());
            print!("{}", reader.download_content(&url).await?);
        }
    }

    Ok(())
}
