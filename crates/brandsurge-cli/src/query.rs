//! Read-only query handlers: brands, metrics and breakdowns.

use brandsurge_core::AppConfig;
use brandsurge_metrics::{brand_list, breakdown, compute_metrics, BrandMetrics, ChannelMetric};

use crate::load::{filter_label, load_table, resolve_window, select};
use crate::WindowArgs;

/// Print the sorted brand list.
///
/// # Errors
///
/// Returns an error if the sources file cannot be loaded.
pub(crate) async fn run_brands(config: &AppConfig) -> anyhow::Result<()> {
    let table = load_table(config).await?;
    for brand in brand_list(&table) {
        println!("{brand}");
    }
    Ok(())
}

/// Print KPIs for one brand or for every mention.
///
/// # Errors
///
/// Returns an error if the sources file cannot be loaded or the brand is unknown.
pub(crate) async fn run_metrics(
    config: &AppConfig,
    brand: Option<&str>,
    window_args: &WindowArgs,
    json: bool,
) -> anyhow::Result<()> {
    let table = load_table(config).await?;
    let window = resolve_window(window_args);
    let slice = select(&table, brand, window.as_ref())?;
    let metrics = compute_metrics(&slice, &table);

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    println!("{}", filter_label(brand, window.as_ref()));
    print_metrics(&metrics);
    Ok(())
}

/// Print the channel, country, keyword and sentiment breakdowns.
///
/// # Errors
///
/// Returns an error if the sources file cannot be loaded or the brand is unknown.
pub(crate) async fn run_breakdown(
    config: &AppConfig,
    brand: Option<&str>,
    metric: ChannelMetric,
    window_args: &WindowArgs,
    json: bool,
) -> anyhow::Result<()> {
    let table = load_table(config).await?;
    let window = resolve_window(window_args);
    let slice = select(&table, brand, window.as_ref())?;
    let result = breakdown(&slice, metric);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", filter_label(brand, window.as_ref()));
    if slice.is_empty() {
        println!("no mentions match the current filters");
        return Ok(());
    }

    println!();
    println!("{:<30}{}", "CHANNEL", metric.to_string().to_uppercase());
    for c in &result.channels {
        println!("{:<30}{:.0}", c.channel, c.value);
    }

    println!();
    println!(
        "{:<30}{:<10}{:<14}{:<14}{:<14}AVG SENTIMENT",
        "CHANNEL", "MENTIONS", "ENGAGEMENT", "VIEWS", "REACH"
    );
    for c in &result.channel_metrics {
        println!(
            "{:<30}{:<10}{:<14.0}{:<14.0}{:<14.0}{:+.2}",
            c.channel, c.mentions, c.engagement, c.views, c.reach, c.avg_sentiment
        );
    }

    println!();
    println!("{:<30}{:<10}AVG SENTIMENT", "COUNTRY", "MENTIONS");
    for c in &result.countries {
        println!("{:<30}{:<10}{:+.2}", c.country, c.mentions, c.avg_sentiment);
    }

    println!();
    println!("{:<30}COUNT", "KEYWORD");
    for k in &result.keywords {
        println!("{:<30}{}", k.label, k.count);
    }

    println!();
    println!("{:<30}COUNT", "SENTIMENT");
    for s in &result.sentiment {
        println!("{:<30}{}", s.label, s.count);
    }

    println!();
    println!("{:<30}ENGAGEMENT", "DAY");
    for d in &result.daily_engagement {
        println!("{:<30}{:.0}", d.date.to_string(), d.value);
    }

    Ok(())
}

fn print_metrics(m: &BrandMetrics) {
    println!("{:<24}{:.1}", "Sentiment Index", m.sentiment_index);
    println!("{:<24}{:.1}%", "Share of Voice", m.share_of_voice);
    println!("{:<24}{:+.1}%", "Trend Velocity", m.trend_velocity);
    println!("{:<24}{:.0}", "Total Reach", m.total_reach);
    println!("{:<24}{}", "Total Mentions", m.total_mentions);
    println!("{:<24}{:.1}", "Avg Engagement", m.avg_engagement);
    println!("{:<24}{:.1}/100", "Health Score", m.health_score);
}
