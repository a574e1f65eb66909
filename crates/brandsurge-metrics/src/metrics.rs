//! Brand KPIs computed over a slice of the prepared table.

use chrono::TimeDelta;
use serde::Serialize;

use brandsurge_core::{columns, Slice, Table};

/// Sentiment index reported for a slice with no rows.
pub const NEUTRAL_SENTIMENT_INDEX: f64 = 50.0;

/// Length of each trend velocity window.
const TREND_WINDOW_DAYS: i64 = 14;

const SENTIMENT_WEIGHT: f64 = 0.4;
const ENGAGEMENT_WEIGHT: f64 = 0.3;
const REACH_WEIGHT: f64 = 0.3;

/// The full KPI mapping for one slice. Every field is always populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrandMetrics {
    /// Mean sentiment score rescaled to 0..=100.
    pub sentiment_index: f64,
    /// Percentage of the reference table's mentions that fall in the slice.
    pub share_of_voice: f64,
    /// Percentage change of the engagement basis between the last two 14-day windows.
    pub trend_velocity: f64,
    pub total_reach: f64,
    pub total_mentions: usize,
    pub avg_engagement: f64,
    /// Weighted composite of sentiment, normalized engagement and normalized reach.
    pub health_score: f64,
    pub normalized_engagement: f64,
    pub normalized_reach: f64,
}

impl Default for BrandMetrics {
    fn default() -> Self {
        Self {
            sentiment_index: NEUTRAL_SENTIMENT_INDEX,
            share_of_voice: 0.0,
            trend_velocity: 0.0,
            total_reach: 0.0,
            total_mentions: 0,
            avg_engagement: 0.0,
            health_score: 0.0,
            normalized_engagement: 0.0,
            normalized_reach: 0.0,
        }
    }
}

/// Computes [`BrandMetrics`] for `slice`.
///
/// `reference` is the full, unfiltered table; it supplies the share-of-voice
/// denominator and the engagement and reach maxima used for normalization.
#[must_use]
pub fn compute_metrics(slice: &Slice<'_>, reference: &Table) -> BrandMetrics {
    if slice.is_empty() {
        return BrandMetrics::default();
    }

    let sentiment_index = sentiment_index(slice);
    let total_reach = slice.sum(columns::REACH).unwrap_or(0.0);
    let avg_engagement = slice.mean(columns::ENGAGEMENT).unwrap_or(0.0);

    let reference_slice = reference.slice();
    let normalized_engagement = percent_of(
        avg_engagement,
        reference_slice.max(columns::ENGAGEMENT).unwrap_or(0.0),
    );
    let normalized_reach = percent_of(
        total_reach,
        reference_slice.max(columns::REACH).unwrap_or(0.0),
    );

    let health_score = SENTIMENT_WEIGHT * sentiment_index
        + ENGAGEMENT_WEIGHT * normalized_engagement
        + REACH_WEIGHT * normalized_reach;

    BrandMetrics {
        sentiment_index,
        share_of_voice: share_of_voice(slice, reference),
        trend_velocity: trend_velocity(slice),
        total_reach,
        total_mentions: slice.len(),
        avg_engagement,
        health_score,
        normalized_engagement,
        normalized_reach,
    }
}

/// `((mean(sentiment_score) + 1) / 2) * 100`, or 50 for an empty slice.
#[must_use]
pub fn sentiment_index(slice: &Slice<'_>) -> f64 {
    slice
        .mean(columns::SENTIMENT_SCORE)
        .map_or(NEUTRAL_SENTIMENT_INDEX, |mean| (mean + 1.0) / 2.0 * 100.0)
}

/// Slice size as a percentage of the reference table; 0 when the reference is empty.
#[must_use]
pub fn share_of_voice(slice: &Slice<'_>, reference: &Table) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let (part, whole) = (slice.len() as f64, reference.len() as f64);
    percent_of(part, whole)
}

/// Percentage change of the engagement basis between the 14 days ending at
/// the slice's latest date and the 14 days before that.
///
/// The basis is summed `Engagement`, or the row count when the table has no
/// `Engagement` column. Returns 0 when the earlier window's basis is 0 or
/// the slice has no parsed dates.
#[must_use]
pub fn trend_velocity(slice: &Slice<'_>) -> f64 {
    let Some(today) = slice.max_timestamp(columns::DATE) else {
        return 0.0;
    };
    let window = TimeDelta::days(TREND_WINDOW_DAYS);
    let recent_start = today - window;
    let previous_start = recent_start - window;

    let recent = slice.filter(|r| {
        r.timestamp(columns::DATE)
            .is_some_and(|ts| ts >= recent_start)
    });
    let previous = slice.filter(|r| {
        r.timestamp(columns::DATE)
            .is_some_and(|ts| ts >= previous_start && ts < recent_start)
    });

    let recent_basis = engagement_basis(&recent);
    let previous_basis = engagement_basis(&previous);
    if previous_basis > 0.0 {
        (recent_basis - previous_basis) / previous_basis * 100.0
    } else {
        0.0
    }
}

/// Summed engagement, falling back to the row count.
pub(crate) fn engagement_basis(slice: &Slice<'_>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let rows = slice.len() as f64;
    slice.sum(columns::ENGAGEMENT).unwrap_or(rows)
}

fn percent_of(value: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        value / whole * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod tests;
