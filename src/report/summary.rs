use std::time::Duration;

use crate::http::RequestSpec;
use crate::loadtest::LoadTestResult;

/// Renders the end-of-run report printed to stdout.
#[must_use]
pub fn render_summary(result: &LoadTestResult, request: &RequestSpec) -> String {
    let mut lines = Vec::new();

    lines.push("Summary".to_owned());
    lines.push(format!("  Target:        {} {}", request.method, request.url));
    lines.push(format!(
        "  Started:       {}",
        result.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines.push(format!("  Duration:      {}", format_duration(result.duration)));
    lines.push(format!("  Requests:      {}", result.total));
    lines.push(format!(
        "  Successful:    {} ({})",
        result.successful,
        format_percent_x100(result.success_rate_x100())
    ));
    lines.push(format!(
        "  Failed:        {} ({})",
        result.failed,
        format_percent_x100(result.error_rate_x100())
    ));
    lines.push(format!("  Requests/sec:  {:.2}", result.requests_per_second));

    lines.push(String::new());
    lines.push("Latency (responses only)".to_owned());
    if result.successful == 0 {
        lines.push("  No responses received.".to_owned());
    } else {
        let stats = result.latency;
        lines.push(format!(
            "  Min / Avg / Max:  {} / {} / {}",
            format_duration(stats.min),
            format_duration(stats.avg),
            format_duration(stats.max)
        ));
        lines.push(format!("  Median:           {}", format_duration(stats.median)));
        lines.push(format!(
            "  P95 / P99:        {} / {}",
            format_duration(stats.p95),
            format_duration(stats.p99)
        ));
    }

    if !result.status_codes.is_empty() {
        lines.push(String::new());
        lines.push("Status codes".to_owned());
        for (status, count) in &result.status_codes {
            lines.push(format!("  {}: {}", status, count));
        }
    }

    if !result.errors.is_empty() {
        lines.push(String::new());
        lines.push("Errors".to_owned());
        for (message, count) in &result.errors {
            lines.push(format!("  {}x {}", count, message));
        }
    }

    lines.join("\n")
}

pub fn print_summary(result: &LoadTestResult, request: &RequestSpec) {
    println!("{}", render_summary(result, request));
}

/// `9_950` renders as `99.50%`.
pub(super) fn format_percent_x100(value: u64) -> String {
    format!(
        "{}.{:02}%",
        value.checked_div(100).unwrap_or(0),
        value.checked_rem(100).unwrap_or(0)
    )
}

/// Milliseconds below one second, seconds from there on; two decimals either way.
pub(super) fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros >= 1_000_000 {
        let centis = micros.checked_div(10_000).unwrap_or(0);
        return format!(
            "{}.{:02}s",
            centis.checked_div(100).unwrap_or(0),
            centis.checked_rem(100).unwrap_or(0)
        );
    }
    let centis = micros.checked_div(10).unwrap_or(0);
    format!(
        "{}.{:02}ms",
        centis.checked_div(100).unwrap_or(0),
        centis.checked_rem(100).unwrap_or(0)
    )
}

