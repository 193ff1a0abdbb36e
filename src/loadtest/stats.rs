use std::time::Duration;

use serde::Serialize;

use super::result::serialize_micros;

/// Latency summary over successful attempts. All zero when there were none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LatencyStats {
    #[serde(rename = "min_us", serialize_with = "serialize_micros")]
    pub min: Duration,
    #[serde(rename = "max_us", serialize_with = "serialize_micros")]
    pub max: Duration,
    #[serde(rename = "avg_us", serialize_with = "serialize_micros")]
    pub avg: Duration,
    #[serde(rename = "median_us", serialize_with = "serialize_micros")]
    pub median: Duration,
    #[serde(rename = "p95_us", serialize_with = "serialize_micros")]
    pub p95: Duration,
    #[serde(rename = "p99_us", serialize_with = "serialize_micros")]
    pub p99: Duration,
}

/// Computes min/max/avg/median and nearest-rank p95/p99.
///
/// Pure: the input is copied and sorted, never modified.
#[must_use]
pub fn compute_latency_stats(samples: &[Duration]) -> LatencyStats {
    if samples.is_empty() {
        return LatencyStats::default();
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let count = sorted.len();
    let sum_nanos = sorted
        .iter()
        .fold(0u128, |sum, sample| sum.saturating_add(sample.as_nanos()));
    let avg_nanos = sum_nanos.checked_div(count as u128).unwrap_or(0);

    LatencyStats {
        min: sorted.first().copied().unwrap_or_default(),
        max: sorted.last().copied().unwrap_or_default(),
        avg: duration_from_nanos(avg_nanos),
        median: median(&sorted),
        p95: nearest_rank(&sorted, 95),
        p99: nearest_rank(&sorted, 99),
    }
}

/// Attempts per second of wall-clock time; 0 for a zero-length run.
#[must_use]
pub fn requests_per_second(total: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    #[expect(
        clippy::float_arithmetic,
        reason = "Throughput is reported as a fractional rate."
    )]
    let rate = total as f64 / secs;
    rate
}

fn median(sorted: &[Duration]) -> Duration {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let lower = mid
            .checked_sub(1)
            .and_then(|index| sorted.get(index))
            .copied()
            .unwrap_or_default();
        let upper = sorted.get(mid).copied().unwrap_or_default();
        let sum = lower.as_nanos().saturating_add(upper.as_nanos());
        duration_from_nanos(sum / 2)
    } else {
        sorted.get(mid).copied().unwrap_or_default()
    }
}

/// Value at `floor(len * percent / 100)`, clamped to the last index.
fn nearest_rank(sorted: &[Duration], percent: usize) -> Duration {
    let last = sorted.len().saturating_sub(1);
    let index = sorted
        .len()
        .saturating_mul(percent)
        .checked_div(100)
        .unwrap_or(0)
        .min(last);
    sorted.get(index).copied().unwrap_or_default()
}

fn duration_from_nanos(nanos: u128) -> Duration {
    u64::try_from(nanos).map_or(Duration::MAX, Duration::from_nanos)
}
