use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orbis_types::{Country, OrbisError};

/// Aggregate figures shown on the summary image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySnapshot {
    /// Total stored rows.
    pub total: u64,
    /// Highest GDP estimates, already ordered.
    pub top: Vec<Country>,
    /// Timestamp of the last successful refresh.
    pub last_refreshed_at: DateTime<Utc>,
}

/// Produces the summary artifact. Failures are reported but never abort a refresh.
#[async_trait]
pub trait SummaryRenderer: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// Render `snapshot`, replacing any previous artifact.
    async fn render(&self, snapshot: &SummarySnapshot) -> Result<(), OrbisError>;
}

/// `2024-05-01 12:00:00 Z` style timestamp.
#[must_use]
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S Z").to_string()
}

/// Dollar amount with thousands separators and two decimals, or `N/A`.
#[must_use]
pub fn format_gdp(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return "N/A".to_string();
    };
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}
