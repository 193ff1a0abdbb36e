use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::aggregator::Aggregation;
use super::stats::{LatencyStats, compute_latency_stats, requests_per_second};

/// Final, immutable snapshot of a run.
///
/// `successful + failed == total` always holds, and `timings` has exactly
/// `successful` entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadTestResult {
    pub started_at: DateTime<Utc>,
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    #[serde(rename = "duration_us", serialize_with = "serialize_micros")]
    pub duration: Duration,
    pub status_codes: BTreeMap<u16, u64>,
    pub errors: BTreeMap<String, u64>,
    pub latency: LatencyStats,
    pub requests_per_second: f64,
    #[serde(rename = "timings_us", serialize_with = "serialize_micros_list")]
    pub timings: Vec<Duration>,
}

impl LoadTestResult {
    pub(super) fn assemble(
        aggregation: Aggregation,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        let latency = compute_latency_stats(&aggregation.timings);
        Self {
            started_at,
            total: aggregation.total,
            successful: aggregation.successful,
            failed: aggregation.failed,
            duration,
            status_codes: aggregation.status_codes,
            errors: aggregation.errors,
            latency,
            requests_per_second: requests_per_second(aggregation.total, duration),
            timings: aggregation.timings,
        }
    }

    /// Share of attempts that got a response, in percent hundredths
    /// (`9_950` means 99.50%).
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        let scaled = u128::from(self.successful)
            .saturating_mul(10_000)
            .checked_div(u128::from(self.total))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    #[must_use]
    pub fn error_rate_x100(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        10_000u64.saturating_sub(self.success_rate_x100())
    }

    /// Percentage of attempts that got a response; 0 for an empty run.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        percent_of(self.successful, self.total)
    }

    /// Percentage of attempts that failed at the transport level.
    #[must_use]
    pub fn error_rate(&self) -> f64 {
        percent_of(self.failed, self.total)
    }
}

fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    #[expect(
        clippy::float_arithmetic,
        reason = "Rates are reported as fractional percentages."
    )]
    let percent = part as f64 * 100.0 / whole as f64;
    percent
}

fn duration_micros(duration: &Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

pub(super) fn serialize_micros<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(duration_micros(duration))
}

fn serialize_micros_list<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(durations.iter().map(duration_micros))
}
