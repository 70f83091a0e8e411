use clap::Parser;
use fastdb::request::{Report, SearchRequest};
use fastdb::{BatchSearchClient, Config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fastdb", about = "Run a Fast-DB batch search and print grouped results")]
struct Cli {
    /// JSON file describing the batch search (single-table or join form).
    request: PathBuf,

    /// Config file to use instead of ~/.config/fastdb/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level to stderr.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    tracing::debug!(base_url = %config.client.base_url, "config loaded");

    let request = SearchRequest::from_file(&cli.request)?;
    let client = BatchSearchClient::new(config.client);
    let result = request.run(&client).await?;
    tracing::info!(
        results = result.total_results,
        groups = result.grouped.len(),
        "batch search complete"
    );

    println!("{}", serde_json::to_string_pretty(&Report::from(result))?);
    Ok(())
}
