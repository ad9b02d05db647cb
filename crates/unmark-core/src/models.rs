//! Data model shared across unmark crates.

use std::collections::BTreeMap;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// Standard alphabet, padding optional.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode standard base64 into bytes, rejecting empty output.
///
/// ASCII whitespace (line wrapping) is ignored and padding is optional.
pub fn decode_base64_image(data: &str) -> Result<Vec<u8>> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT_BASE64.decode(compact)?;
    if bytes.is_empty() {
        return Err(Error::DecodeFailed("image data is empty".to_string()));
    }
    Ok(bytes)
}

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Base64 image as sent by the client and forwarded to providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// Standard base64 image bytes.
    pub data: String,
    #[serde(alias = "mimeType")]
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Decode the payload into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_base64_image(&self.data)
    }
}

/// A validated removal request, consumed once by the request handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalRequest {
    pub image: ImagePayload,
    pub removal_text: String,
}

impl RemovalRequest {
    /// Build a request, falling back to the default removal target when the
    /// caller's text is absent or blank.
    pub fn new(image: ImagePayload, removal_text: Option<&str>) -> Self {
        let removal_text = removal_text
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults::REMOVAL_TEXT)
            .to_string();
        Self {
            image,
            removal_text,
        }
    }
}

/// Output image produced by whichever provider succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResult {
    /// Base64 image in the provider's native format.
    pub base64_image: String,
    /// Name of the provider that produced the image.
    pub provider: String,
}

impl ProviderResult {
    /// Decode into the bytes sent back to the caller.
    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_base64_image(&self.base64_image)
    }
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Top-level counters of the statistics record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    TotalRuns,
    SuccessfulRuns,
    FailedRuns,
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TotalRuns => write!(f, "totalRuns"),
            Self::SuccessfulRuns => write!(f, "successfulRuns"),
            Self::FailedRuns => write!(f, "failedRuns"),
        }
    }
}

/// Per-day counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyField {
    Total,
    Successful,
    Failed,
}

impl std::fmt::Display for DailyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Total => write!(f, "total"),
            Self::Successful => write!(f, "successful"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Counters for one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub successful: u64,
    #[serde(default)]
    pub failed: u64,
}

impl DailyStats {
    pub fn increment(&mut self, field: DailyField) {
        match field {
            DailyField::Total => self.total += 1,
            DailyField::Successful => self.successful += 1,
            DailyField::Failed => self.failed += 1,
        }
    }
}

/// Aggregate usage record persisted under a single key.
///
/// Every field defaults when missing so records written before `dailyStats`
/// existed still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub total_runs: u64,
    #[serde(default)]
    pub successful_runs: u64,
    #[serde(default)]
    pub failed_runs: u64,
    #[serde(default)]
    pub last_run_timestamp: Option<DateTime<Utc>>,
    /// Keyed by `YYYY-MM-DD`.
    #[serde(default)]
    pub daily_stats: BTreeMap<String, DailyStats>,
}

impl Statistics {
    pub fn increment(&mut self, counter: Counter) {
        match counter {
            Counter::TotalRuns => self.total_runs += 1,
            Counter::SuccessfulRuns => self.successful_runs += 1,
            Counter::FailedRuns => self.failed_runs += 1,
        }
    }

    /// Increment a field of the given day, creating the entry if needed.
    pub fn increment_daily(&mut self, date: NaiveDate, field: DailyField) {
        self.daily_stats
            .entry(date_key(date))
            .or_default()
            .increment(field);
    }

    /// Counters for a day; zero when the day was never touched.
    pub fn day(&self, date: NaiveDate) -> DailyStats {
        self.daily_stats
            .get(&date_key(date))
            .copied()
            .unwrap_or_default()
    }

    /// Share of successful runs in percent, `None` before the first run.
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_runs == 0 {
            return None;
        }
        Some(self.successful_runs as f64 / self.total_runs as f64 * 100.0)
    }
}

/// Format a date as a `dailyStats` key.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The last [`defaults::TREND_DAYS`] calendar dates ending at `today`, most
/// recent first.
pub fn last_seven_days(today: NaiveDate) -> Vec<String> {
    (0..defaults::TREND_DAYS as i64)
        .map(|offset| date_key(today - Duration::days(offset)))
        .collect()
}
