use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reel_client::{MojoParser, PageLayout, ReqwestFetcher};
use reel_core::{ApiConfig, BoxOfficeConfig, BoxOfficeService, DetailService, DiscoveryService};

#[derive(Parser)]
#[command(name = "reel", version, about = "Movie metadata and box-office dataset builder")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Settings {
    /// Movie-database API base URL
    #[arg(long, global = true, env = "THE_MOVIE_DB_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token for the movie-database API
    #[arg(long, global = true, env = "THE_MOVIE_DB_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Movie-database API key (recorded, not sent)
    #[arg(long, global = true, env = "THE_MOVIE_DB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Box-office site base URL
    #[arg(
        long,
        global = true,
        env = "REEL_BOX_OFFICE_URL",
        default_value = reel_core::config::DEFAULT_BOX_OFFICE_URL
    )]
    box_office_url: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch popular movies page by page and save them as CSV
    Discover {
        /// Number of listing pages to fetch
        #[arg(short, long)]
        pages: u32,

        /// Attempts per page before giving up
        #[arg(long, default_value_t = 5)]
        max_retries: u32,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Add detail columns (budget, genres, imdb_id, ...) to a movie CSV
    Details {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Add box-office columns to a CSV with an imdb_id column
    BoxOffice {
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file (may equal the input)
        #[arg(short, long)]
        output: PathBuf,

        /// Parse pages with the legacy layout
        #[arg(long, default_value_t = false)]
        legacy_layout: bool,
    },

    /// Aggregate box-office figures for a single title
    Title {
        #[arg(long)]
        imdb_id: String,

        #[arg(short, long)]
        output: PathBuf,

        /// Parse pages with the legacy layout
        #[arg(long, default_value_t = false)]
        legacy_layout: bool,
    },

    /// Discover, enrich with details, then add box-office figures in place
    Run {
        #[arg(short, long)]
        pages: u32,

        #[arg(long, default_value_t = 5)]
        max_retries: u32,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("reel=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings;
    let fetcher = ReqwestFetcher::with_timeout(Duration::from_secs(settings.timeout_secs))
        .context("Failed to create HTTP client")?;

    match cli.command {
        Commands::Discover {
            pages,
            max_retries,
            output,
        } => {
            let config = api_config(&settings)?;
            cmd_discover(&fetcher, &config, pages, max_retries, &output).await?;
        }
        Commands::Details { input, output } => {
            let config = api_config(&settings)?;
            cmd_details(&fetcher, &config, &input, &output).await?;
        }
        Commands::BoxOffice {
            input,
            output,
            legacy_layout,
        } => {
            let service = box_office_service(&settings, &fetcher, legacy_layout)?;
            let report = service
                .update_table(&input, &output)
                .await
                .with_context(|| format!("Box office update failed for {}", input.display()))?;
            println!(
                "Box office figures added to {} of {} rows -> {}",
                report.updated,
                report.total,
                output.display()
            );
        }
        Commands::Title {
            imdb_id,
            output,
            legacy_layout,
        } => {
            let service = box_office_service(&settings, &fetcher, legacy_layout)?;
            let table = service
                .aggregate_to_csv(&imdb_id, &output)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{} box office columns for {} -> {}",
                table.headers().len() - 1,
                imdb_id,
                output.display()
            );
        }
        Commands::Run {
            pages,
            max_retries,
            output,
        } => {
            let config = api_config(&settings)?;
            cmd_discover(&fetcher, &config, pages, max_retries, &output).await?;
            cmd_details(&fetcher, &config, &output, &output).await?;

            let service = box_office_service(&settings, &fetcher, false)?;
            let report = service
                .update_table(&output, &output)
                .await
                .with_context(|| format!("Box office update failed for {}", output.display()))?;
            println!(
                "Pipeline complete: {} rows, {} with box office figures -> {}",
                report.total,
                report.updated,
                output.display()
            );
        }
    }

    Ok(())
}

fn api_config(settings: &Settings) -> Result<ApiConfig> {
    let base_url = settings
        .base_url
        .as_deref()
        .context("THE_MOVIE_DB_BASE_URL not set. Pass --base-url or set it in .env.")?;
    let access_token = settings
        .access_token
        .as_deref()
        .context("THE_MOVIE_DB_ACCESS_TOKEN not set. Pass --access-token or set it in .env.")?;

    let config = ApiConfig::new(base_url, access_token)?;
    Ok(match &settings.api_key {
        Some(key) => config.with_api_key(key.clone()),
        None => config,
    })
}

fn box_office_service(
    settings: &Settings,
    fetcher: &ReqwestFetcher,
    legacy_layout: bool,
) -> Result<BoxOfficeService<ReqwestFetcher, MojoParser>> {
    let layout = if legacy_layout {
        PageLayout::legacy()
    } else {
        PageLayout::current()
    };
    let parser = MojoParser::with_layout(layout)?;
    let config = BoxOfficeConfig::new(&settings.box_office_url)?;
    Ok(BoxOfficeService::new(fetcher.clone(), parser, config))
}

async fn cmd_discover(
    fetcher: &ReqwestFetcher,
    config: &ApiConfig,
    pages: u32,
    max_retries: u32,
    output: &Path,
) -> Result<()> {
    tracing::info!(pages, max_retries, "Starting discovery");

    let table = DiscoveryService::new(fetcher.clone())
        .save_to_csv(config, pages, max_retries, output)
        .await
        .context("Discovery failed")?;

    println!("Data saved to {} ({} movies)", output.display(), table.len());
    Ok(())
}

async fn cmd_details(
    fetcher: &ReqwestFetcher,
    config: &ApiConfig,
    input: &Path,
    output: &Path,
) -> Result<()> {
    tracing::info!(input = %input.display(), "Adding movie details");

    let report = DetailService::new(fetcher.clone())
        .add_details_to_csv(config, input, output)
        .await
        .with_context(|| format!("Detail enrichment failed for {}", input.display()))?;

    println!(
        "Updated data saved to {} ({} enriched, {} failed)",
        output.display(),
        report.enriched,
        report.failed
    );
    Ok(())
}
