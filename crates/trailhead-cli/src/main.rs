mod ingest;
mod rate;
mod scrape;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "trailhead")]
#[command(about = "National-park trail data pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch NPS REST API endpoints into the warehouse
    Ingest {
        /// Restrict the run to a single endpoint (e.g. "parks", "events")
        #[arg(long)]
        endpoint: Option<trailhead_nps::Endpoint>,
    },
    /// Scrape hiking trails from park websites into the warehouse
    Scrape {
        /// Restrict scraping to a single park (by park code)
        #[arg(long)]
        park: Option<String>,

        /// Also write the scraped trails to a JSON file
        #[arg(long)]
        output: Option<std::path::PathBuf>,

        /// List the parks that would be scraped without fetching anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Rate trails without an extracted difficulty using the rating model
    Rate {
        /// Maximum number of trails to rate in this run
        #[arg(long, default_value_t = 100)]
        limit: i64,
    },
    /// Show recent collection runs
    Runs {
        /// Maximum number of runs to display
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = trailhead_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();
    tracing::debug!(?config, "configuration loaded");

    let cli = Cli::parse();

    let pool_config = trailhead_db::PoolConfig {
        max_connections: config.db_max_connections,
        min_connections: config.db_min_connections,
        acquire_timeout_secs: config.db_acquire_timeout_secs,
    };
    let pool = trailhead_db::connect_pool(&config.database_url, pool_config).await?;
    trailhead_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Ingest { endpoint } => ingest::run_ingest(&pool, &config, endpoint).await,
        Commands::Scrape {
            park,
            output,
            dry_run,
        } => scrape::run_scrape(&pool, &config, park.as_deref(), output.as_deref(), dry_run).await,
        Commands::Rate { limit } => rate::run_rate(&pool, &config, limit).await,
        Commands::Runs { limit } => print_runs(&pool, limit).await,
    }
}

/// Mark a run as failed without masking the error that got us here.
pub(crate) async fn fail_run_best_effort(
    pool: &sqlx::PgPool,
    run_id: i64,
    run_type: &str,
    message: String,
) {
    if let Err(e) = trailhead_db::fail_collection_run(pool, run_id, &message).await {
        tracing::error!(
            run_id,
            run_type,
            error = %e,
            "failed to mark collection run as failed"
        );
    }
}

async fn print_runs(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let runs = trailhead_db::list_collection_runs(pool, limit).await?;
    if runs.is_empty() {
        println!("No collection runs recorded yet.");
        return Ok(());
    }

    println!(
        "{:>5} | {:<8} | {:<9} | {:>8} | {:<20} | {}",
        "id", "type", "status", "records", "created", "error"
    );
    println!("{}", "-".repeat(90));
    for run in runs {
        println!(
            "{:>5} | {:<8} | {:<9} | {:>8} | {:<20} | {}",
            run.id,
            run.run_type,
            run.status,
            run.records_processed,
            run.created_at.format("%Y-%m-%d %H:%M:%S"),
            run.error_message.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}
