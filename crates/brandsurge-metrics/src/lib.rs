//! Brand KPIs and breakdowns over the prepared mention table.
//!
//! Every function here is pure: it reads a [`brandsurge_core::Slice`] (and,
//! where normalization needs it, the full reference table) and never
//! mutates either.

pub mod brands;
pub mod breakdown;
pub mod metrics;
pub mod summary;
pub mod window;

pub use brands::{brand_list, is_brand, metrics_by_brand, NO_BRANDS_FOUND};
pub use breakdown::{
    breakdown, channel_breakdown, channel_metrics, country_sentiment, daily_engagement,
    keyword_frequency, keyword_tokens, sentiment_distribution, top_sources, Breakdown,
    ChannelMetric, ChannelMetrics, ChannelValue, CountrySentiment, DailyValue, LabelCount,
};
pub use metrics::{
    compute_metrics, sentiment_index, share_of_voice, trend_velocity, BrandMetrics,
    NEUTRAL_SENTIMENT_INDEX,
};
pub use summary::{summarize, Summary, TrendDirection, NO_DATA_SUMMARY};
pub use window::{DateWindow, DEFAULT_WINDOW_DAYS};
