use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sudomemo::config::Config;
use sudomemo::download::download_metadata;
use sudomemo::{ExtractorRegistry, HttpFetcher, ui};

#[derive(Parser)]
#[command(name = "sudomemo", version, about = "Extract flipnote metadata from Sudomemo / flipnot.es")]
struct Cli {
    /// Flipnote URL (sudomemo.net/watch/... or flipnot.es/...)
    url: String,

    /// Download the video after extracting its metadata
    #[arg(short, long)]
    download: bool,

    /// Directory to save the video in
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON record
    #[arg(long)]
    pretty: bool,

    /// Hide the download progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    init_logging(&config, cli.verbose);

    let fetcher = HttpFetcher::new(&config.user_agent, config.timeout())
        .context("Failed to set up HTTP client")?;
    let registry = ExtractorRegistry::default();

    let metadata = registry
        .extract(&cli.url, &fetcher)
        .await
        .with_context(|| format!("Failed to extract {}", cli.url))?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&metadata)?
    } else {
        serde_json::to_string(&metadata)?
    };
    println!("{}", json);

    if cli.download {
        let dir = cli.output.unwrap_or_else(|| config.resolve_download_dir());
        let progress = if cli.quiet {
            ui::hidden_bar()
        } else {
            ui::download_bar()
        };

        let path = download_metadata(fetcher.client(), &metadata, &dir, &progress)
            .await
            .context("Failed to download video")?;
        eprintln!("Saved {}", path.display());
    }

    Ok(())
}

fn init_logging(config: &Config, verbose: bool) {
    let default_level = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
