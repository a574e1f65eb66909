//! Markdown report generation.

use brandsurge_core::AppConfig;
use brandsurge_metrics::{compute_metrics, metrics_by_brand, summarize, BrandMetrics};
use chrono::Utc;

use crate::load::{filter_label, load_table, resolve_window, select};
use crate::WindowArgs;

/// Generate a markdown report: a KPI table per brand plus a narrative summary.
///
/// # Errors
///
/// Returns an error if the sources file cannot be loaded or the brand is unknown.
pub(crate) async fn run_report(
    config: &AppConfig,
    brand: Option<&str>,
    window_args: &WindowArgs,
) -> anyhow::Result<()> {
    let table = load_table(config).await?;
    let window = resolve_window(window_args);
    let slice = select(&table, brand, window.as_ref())?;

    let rows: Vec<(String, BrandMetrics)> = match brand {
        Some(name) => vec![(name.to_string(), compute_metrics(&slice, &table))],
        None => metrics_by_brand(&slice, &table),
    };

    let now = Utc::now().format("%Y-%m-%d %H:%M UTC");

    println!("# Brand Report");
    println!();
    println!("**Generated**: {now}");
    println!("**Filter**: {}", filter_label(brand, window.as_ref()));
    println!("**Mentions**: {}", slice.len());
    println!();
    println!("---");
    println!();

    if rows.is_empty() {
        println!("No brands found.");
        return Ok(());
    }

    println!("| Brand | Mentions | Sentiment Index | Share of Voice | Trend Velocity | Total Reach | Avg Engagement | Health |");
    println!("|-------|----------|-----------------|----------------|----------------|-------------|----------------|--------|");
    for (name, m) in &rows {
        println!(
            "| {} | {} | {:.1} | {:.1}% | {:+.1}% | {:.0} | {:.1} | {:.1} |",
            name,
            m.total_mentions,
            m.sentiment_index,
            m.share_of_voice,
            m.trend_velocity,
            m.total_reach,
            m.avg_engagement,
            m.health_score
        );
    }

    println!();
    println!("## Summary");
    for (name, m) in &rows {
        let summary = summarize(&slice.for_brand(name), m);
        println!();
        println!("**{name}**: {}", summary.text);
    }

    Ok(())
}
