//! Shared loading for every command: sources file, aggregation, preparation.

use brandsurge_core::{AppConfig, Slice, Table};
use brandsurge_ingest::{load_all_concurrent, prepared, LoadOutcome};
use brandsurge_metrics::{brand_list, is_brand, DateWindow};
use chrono::Utc;

use crate::WindowArgs;

/// Loads the configured sources without preparing them.
///
/// # Errors
///
/// Returns an error if the sources file cannot be read or is invalid.
pub(crate) async fn load_outcome(config: &AppConfig) -> anyhow::Result<LoadOutcome> {
    let sources = brandsurge_core::load_sources(&config.sources_path)?;
    tracing::debug!(
        path = %config.sources_path.display(),
        sources = sources.sources.len(),
        "loaded sources file"
    );
    Ok(load_all_concurrent(&sources.sources, config.max_concurrent_sources).await)
}

/// Loads and prepares the combined mention table.
///
/// # Errors
///
/// Returns an error if the sources file cannot be read or is invalid.
pub(crate) async fn load_table(config: &AppConfig) -> anyhow::Result<Table> {
    let outcome = load_outcome(config).await?;
    Ok(prepared(outcome.table))
}

/// Resolves the window arguments; `None` means no date filter.
pub(crate) fn resolve_window(args: &WindowArgs) -> Option<DateWindow> {
    if args.all_dates {
        return None;
    }
    Some(DateWindow::resolve(
        args.from,
        args.to,
        Utc::now().date_naive(),
    ))
}

/// Selects the rows for `brand` (all rows when `None`) within `window`.
///
/// # Errors
///
/// Returns an error if `brand` is not present in the table.
pub(crate) fn select<'a>(
    table: &'a Table,
    brand: Option<&str>,
    window: Option<&DateWindow>,
) -> anyhow::Result<Slice<'a>> {
    let mut slice = table.slice();
    if let Some(name) = brand {
        if !is_brand(name) || !brand_list(table).iter().any(|b| b == name) {
            anyhow::bail!("brand '{name}' not found");
        }
        slice = slice.for_brand(name);
    }
    if let Some(window) = window {
        slice = window.apply(&slice);
    }
    Ok(slice)
}

/// Human label for the active filters.
pub(crate) fn filter_label(brand: Option<&str>, window: Option<&DateWindow>) -> String {
    let brand = brand.unwrap_or("All brands");
    match window {
        Some(w) => format!("{brand}, {} to {}", w.from, w.to),
        None => format!("{brand}, all dates"),
    }
}
