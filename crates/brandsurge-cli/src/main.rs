mod load;
mod query;
mod report;
mod validate;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use brandsurge_metrics::ChannelMetric;

#[derive(Debug, Parser)]
#[command(name = "brandsurge-cli")]
#[command(about = "Brand mention analytics from CSV, JSON and vendor exports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Date filter shared by the slice-reading commands.
#[derive(Debug, Clone, Default, clap::Args)]
struct WindowArgs {
    /// First day to include (YYYY-MM-DD); defaults to 30 days before --to
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD); defaults to today
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Ignore dates entirely and use every mention
    #[arg(long, conflicts_with_all = ["from", "to"])]
    all_dates: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the brands found across all sources
    Brands,
    /// Compute KPIs for one brand, or for all mentions when no brand is given
    Metrics {
        /// Restrict to a single brand
        #[arg(long)]
        brand: Option<String>,

        #[command(flatten)]
        window: WindowArgs,

        /// Print the metrics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Channel, country, keyword and sentiment breakdowns
    Breakdown {
        /// Restrict to a single brand
        #[arg(long)]
        brand: Option<String>,

        /// Value summed per channel
        #[arg(long, default_value_t = ChannelMetric::Mentions)]
        metric: ChannelMetric,

        #[command(flatten)]
        window: WindowArgs,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report with per-brand KPIs and a summary
    Report {
        /// Restrict to a single brand
        #[arg(long)]
        brand: Option<String>,

        #[command(flatten)]
        window: WindowArgs,
    },
    /// Load every configured source and report what was read or skipped
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = brandsurge_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Brands) => query::run_brands(&config).await?,
        Some(Commands::Metrics {
            brand,
            window,
            json,
        }) => query::run_metrics(&config, brand.as_deref(), &window, json).await?,
        Some(Commands::Breakdown {
            brand,
            metric,
            window,
            json,
        }) => query::run_breakdown(&config, brand.as_deref(), metric, &window, json).await?,
        Some(Commands::Report { brand, window }) => {
            report::run_report(&config, brand.as_deref(), &window).await?;
        }
        Some(Commands::Validate) => validate::run_validate(&config).await?,
        None => println!("no command given; run with --help for usage"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
