use serde::Serialize;

use brandsurge_core::Slice;

use crate::breakdown::{sentiment_distribution, top_sources};
use crate::metrics::BrandMetrics;

pub const NO_DATA_SUMMARY: &str = "No data available for recommendations.";

/// Direction of the trend velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
}

impl TrendDirection {
    #[must_use]
    pub fn from_velocity(velocity: f64) -> Self {
        if velocity > 0.0 {
            TrendDirection::Upward
        } else if velocity < 0.0 {
            TrendDirection::Downward
        } else {
            TrendDirection::Stable
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Upward => "upward",
            TrendDirection::Downward => "downward",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Headline facts about a slice plus their rendered sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub dominant_sentiment: Option<String>,
    pub trend: TrendDirection,
    pub primary_channel: Option<String>,
    pub text: String,
}

#[must_use]
pub fn summarize(slice: &Slice<'_>, metrics: &BrandMetrics) -> Summary {
    let trend = TrendDirection::from_velocity(metrics.trend_velocity);
    if slice.is_empty() {
        return Summary {
            dominant_sentiment: None,
            trend,
            primary_channel: None,
            text: NO_DATA_SUMMARY.to_string(),
        };
    }

    let dominant_sentiment = sentiment_distribution(slice)
        .into_iter()
        .next()
        .map(|c| c.label);
    let primary_channel = top_sources(slice).into_iter().next().map(|c| c.label);

    let sentiment = dominant_sentiment.as_deref().unwrap_or("neutral");
    let channel = primary_channel.as_deref().unwrap_or("Unknown");
    let text = format!(
        "Your brand is experiencing {sentiment} sentiment with a {trend} trend \
         ({velocity:.1}% velocity). The primary engagement channel is {channel} \
         with {mentions} total mentions. Marketing health score is at {health:.1}/100.",
        trend = trend.as_str(),
        velocity = metrics.trend_velocity,
        mentions = metrics.total_mentions,
        health = metrics.health_score,
    );

    Summary {
        dominant_sentiment,
        trend,
        primary_channel,
        text,
    }
}

#[cfg(test)]
mod tests {
    use brandsurge_core::{columns, Cell, Table};

    use super::*;
    use crate::metrics::compute_metrics;

    #[test]
    fn trend_direction_follows_velocity_sign() {
        assert_eq!(TrendDirection::from_velocity(12.0), TrendDirection::Upward);
        assert_eq!(TrendDirection::from_velocity(-0.5), TrendDirection::Downward);
        assert_eq!(TrendDirection::from_velocity(0.0), TrendDirection::Stable);
    }

    #[test]
    fn empty_slice_gets_fixed_sentence() {
        let table = Table::new();
        let summary = summarize(&table.slice(), &BrandMetrics::default());
        assert_eq!(summary.text, NO_DATA_SUMMARY);
        assert!(summary.primary_channel.is_none());
    }

    #[test]
    fn summary_names_dominant_sentiment_and_channel() {
        let table = Table::from_records(
            [("positive", "Twitter"), ("positive", "Reddit"), ("negative", "Twitter")]
                .into_iter()
                .map(|(s, src)| {
                    [
                        (columns::SENTIMENT, Cell::text(s)),
                        (columns::SOURCE, Cell::text(src)),
                    ]
                    .into_iter()
                    .collect()
                })
                .collect(),
        );
        let slice = table.slice();
        let summary = summarize(&slice, &compute_metrics(&slice, &table));

        assert_eq!(summary.dominant_sentiment.as_deref(), Some("positive"));
        assert_eq!(summary.primary_channel.as_deref(), Some("Twitter"));
        assert_eq!(summary.trend, TrendDirection::Stable);
        assert!(summary.text.contains("3 total mentions"));
        assert!(summary.text.contains("stable trend"));
    }
}
