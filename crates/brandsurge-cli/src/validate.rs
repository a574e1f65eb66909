//! `validate`: load every source and report the outcome without computing metrics.

use brandsurge_core::AppConfig;
use brandsurge_ingest::SourceStatus;

use crate::load::load_outcome;

/// Print one line per configured source.
///
/// # Errors
///
/// Returns an error if the sources file cannot be loaded, or if every
/// configured source was skipped.
pub(crate) async fn run_validate(config: &AppConfig) -> anyhow::Result<()> {
    let outcome = load_outcome(config).await?;

    println!("{:<50}{:<20}{:<10}{:<10}NOTE", "SOURCE", "FORMAT", "ROWS", "SKIPPED");
    for report in &outcome.reports {
        let location = report.location.display().to_string();
        let format = report.format.to_string();
        match &report.status {
            SourceStatus::Loaded {
                rows,
                skipped_records,
            } => println!("{location:<50}{format:<20}{rows:<10}{skipped_records:<10}ok"),
            SourceStatus::Skipped { reason } => {
                println!("{location:<50}{format:<20}{:<10}{:<10}{reason}", "-", "-");
            }
        }
    }

    let skipped = outcome.skipped_sources();
    println!();
    println!(
        "{} sources, {} loaded, {} skipped, {} rows",
        outcome.reports.len(),
        outcome.reports.len() - skipped,
        skipped,
        outcome.table.len()
    );

    if !outcome.reports.is_empty() && skipped == outcome.reports.len() {
        anyhow::bail!("all {skipped} sources were skipped");
    }
    Ok(())
}
