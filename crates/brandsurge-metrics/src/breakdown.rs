//! Grouped views of a slice: channels, countries, keywords, sentiment mix
//! and the recent daily engagement trend.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use brandsurge_core::{columns, Slice};

use crate::metrics::engagement_basis;

const TOP_CHANNELS: usize = 10;
const TOP_COUNTRIES: usize = 15;
const TOP_KEYWORDS: usize = 20;
const TOP_SOURCES: usize = 5;
const TREND_DAYS: i64 = 7;

/// Country label excluded from the geographic breakdown.
const UNKNOWN_COUNTRY: &str = "Unknown";

/// Value summed per channel in [`channel_breakdown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelMetric {
    #[default]
    Mentions,
    Views,
    Engagement,
    #[serde(rename = "Estimated Views", alias = "estimated-views", alias = "EstimatedViews")]
    EstimatedViews,
}

impl ChannelMetric {
    /// Column summed for this metric; `None` means row count.
    #[must_use]
    pub fn column(self) -> Option<&'static str> {
        match self {
            ChannelMetric::Mentions => None,
            ChannelMetric::Views => Some(columns::VIEWS),
            ChannelMetric::Engagement => Some(columns::ENGAGEMENT),
            ChannelMetric::EstimatedViews => Some(columns::ESTIMATED_VIEWS),
        }
    }
}

impl fmt::Display for ChannelMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelMetric::Mentions => write!(f, "Mentions"),
            ChannelMetric::Views => write!(f, "Views"),
            ChannelMetric::Engagement => write!(f, "Engagement"),
            ChannelMetric::EstimatedViews => write!(f, "Estimated Views"),
        }
    }
}

impl FromStr for ChannelMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "mentions" => Ok(ChannelMetric::Mentions),
            "views" => Ok(ChannelMetric::Views),
            "engagement" => Ok(ChannelMetric::Engagement),
            "estimatedviews" => Ok(ChannelMetric::EstimatedViews),
            _ => Err(format!(
                "unknown channel metric \"{s}\" (expected Mentions, Views, Engagement or Estimated Views)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelValue {
    pub channel: String,
    pub value: f64,
}

/// Per-channel totals shown in the detailed channel table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelMetrics {
    pub channel: String,
    pub mentions: usize,
    pub engagement: f64,
    pub views: f64,
    pub reach: f64,
    /// Mean `sentiment_score` in -1..=1.
    pub avg_sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySentiment {
    pub country: String,
    pub mentions: usize,
    /// Mean `sentiment_score` in -1..=1.
    pub avg_sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: f64,
}

/// Every breakdown for one slice, as served by the API and CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    pub metric: ChannelMetric,
    pub channels: Vec<ChannelValue>,
    pub channel_metrics: Vec<ChannelMetrics>,
    pub countries: Vec<CountrySentiment>,
    pub keywords: Vec<LabelCount>,
    pub sentiment: Vec<LabelCount>,
    pub top_sources: Vec<LabelCount>,
    pub daily_engagement: Vec<DailyValue>,
}

#[must_use]
pub fn breakdown(slice: &Slice<'_>, metric: ChannelMetric) -> Breakdown {
    Breakdown {
        metric,
        channels: channel_breakdown(slice, metric),
        channel_metrics: channel_metrics(slice),
        countries: country_sentiment(slice),
        keywords: keyword_frequency(slice),
        sentiment: sentiment_distribution(slice),
        top_sources: top_sources(slice),
        daily_engagement: daily_engagement(slice),
    }
}

/// Per-`Source` totals of `metric`, descending, top 10.
///
/// A metric whose column the table lacks falls back to mention counts.
#[must_use]
pub fn channel_breakdown(slice: &Slice<'_>, metric: ChannelMetric) -> Vec<ChannelValue> {
    if !slice.has_column(columns::SOURCE) {
        return Vec::new();
    }
    let column = metric.column().filter(|c| slice.has_column(c));

    let mut totals: Vec<(String, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in slice.iter() {
        let Some(channel) = row.get(columns::SOURCE).label() else {
            continue;
        };
        let value = column.map_or(1.0, |c| row.number(c).unwrap_or(0.0));
        let slot = *index.entry(channel.clone()).or_insert_with(|| {
            totals.push((channel, 0.0));
            totals.len() - 1
        });
        totals[slot].1 += value;
    }

    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals
        .into_iter()
        .take(TOP_CHANNELS)
        .map(|(channel, value)| ChannelValue { channel, value })
        .collect()
}

/// Mentions, summed `Engagement`, `Views` and `Reach`, and mean sentiment per
/// `Source`; top 10 by mentions, ties in first-seen order.
///
/// A summed column the table lacks reports the mention count instead.
#[must_use]
pub fn channel_metrics(slice: &Slice<'_>) -> Vec<ChannelMetrics> {
    if !slice.has_column(columns::SOURCE) {
        return Vec::new();
    }
    let summed = [columns::ENGAGEMENT, columns::VIEWS, columns::REACH]
        .map(|c| Some(c).filter(|c| slice.has_column(c)));

    let mut groups: Vec<(ChannelMetrics, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in slice.iter() {
        let Some(channel) = row.get(columns::SOURCE).label() else {
            continue;
        };
        let slot = *index.entry(channel.clone()).or_insert_with(|| {
            groups.push((
                ChannelMetrics {
                    channel,
                    mentions: 0,
                    engagement: 0.0,
                    views: 0.0,
                    reach: 0.0,
                    avg_sentiment: 0.0,
                },
                0.0,
            ));
            groups.len() - 1
        });
        let [engagement, views, reach] =
            summed.map(|c| c.map_or(1.0, |c| row.number(c).unwrap_or(0.0)));
        let (group, score_sum) = &mut groups[slot];
        group.mentions += 1;
        group.engagement += engagement;
        group.views += views;
        group.reach += reach;
        *score_sum += row.number(columns::SENTIMENT_SCORE).unwrap_or(0.0);
    }

    groups.sort_by(|a, b| b.0.mentions.cmp(&a.0.mentions));
    groups
        .into_iter()
        .take(TOP_CHANNELS)
        .map(|(mut group, score_sum)| {
            #[allow(clippy::cast_precision_loss)]
            let mentions = group.mentions as f64;
            group.avg_sentiment = score_sum / mentions;
            group
        })
        .collect()
}

/// Mentions and mean sentiment per `Country`, excluding `Unknown`; top 15 by mentions.
#[must_use]
pub fn country_sentiment(slice: &Slice<'_>) -> Vec<CountrySentiment> {
    let mut groups: Vec<(String, usize, f64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in slice.iter() {
        let Some(country) = row.get(columns::COUNTRY).label() else {
            continue;
        };
        if country == UNKNOWN_COUNTRY {
            continue;
        }
        let score = row.number(columns::SENTIMENT_SCORE).unwrap_or(0.0);
        let slot = *index.entry(country.clone()).or_insert_with(|| {
            groups.push((country, 0, 0.0));
            groups.len() - 1
        });
        groups[slot].1 += 1;
        groups[slot].2 += score;
    }

    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
        .into_iter()
        .take(TOP_COUNTRIES)
        .map(|(country, mentions, score_sum)| {
            #[allow(clippy::cast_precision_loss)]
            let avg_sentiment = score_sum / mentions as f64;
            CountrySentiment {
                country,
                mentions,
                avg_sentiment,
            }
        })
        .collect()
}

/// Splits a keyword cell into case-folded tokens. `;` and `,` both delimit.
#[must_use]
pub fn keyword_tokens(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Token counts across `Key Phrases` and `Keywords`; top 20, ties by first appearance.
#[must_use]
pub fn keyword_frequency(slice: &Slice<'_>) -> Vec<LabelCount> {
    let tokens = slice.iter().flat_map(|row| {
        [columns::KEY_PHRASES, columns::KEYWORDS]
            .into_iter()
            .filter_map(|c| row.get(c).label())
            .flat_map(|raw| keyword_tokens(&raw))
            .collect::<Vec<_>>()
    });
    ranked_counts(tokens, TOP_KEYWORDS)
}

/// Mentions per `Sentiment` label as written, descending.
#[must_use]
pub fn sentiment_distribution(slice: &Slice<'_>) -> Vec<LabelCount> {
    ranked_counts(
        slice.iter().filter_map(|r| r.get(columns::SENTIMENT).label()),
        usize::MAX,
    )
}

/// The five most frequent `Source` values.
#[must_use]
pub fn top_sources(slice: &Slice<'_>) -> Vec<LabelCount> {
    ranked_counts(
        slice.iter().filter_map(|r| r.get(columns::SOURCE).label()),
        TOP_SOURCES,
    )
}

/// Engagement per calendar day over the 7 days ending at the slice's latest
/// date, oldest first. Days without mentions are reported as 0.
#[must_use]
pub fn daily_engagement(slice: &Slice<'_>) -> Vec<DailyValue> {
    let Some(last) = slice.max_timestamp(columns::DATE).map(|ts| ts.date()) else {
        return Vec::new();
    };
    (0..TREND_DAYS)
        .rev()
        .map(|offset| {
            let date = last - TimeDelta::days(offset);
            DailyValue {
                date,
                value: engagement_basis(&slice.within(date, date)),
            }
        })
        .collect()
}

/// Counts labels and returns the `limit` most frequent, ties in first-seen order.
fn ranked_counts(labels: impl Iterator<Item = String>, limit: usize) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for label in labels {
        match index.get(&label) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push(LabelCount { label, count: 1 });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
#[path = "breakdown_test.rs"]
mod tests;
