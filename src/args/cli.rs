use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_header, parse_positive_duration_arg};
use super::types::HttpMethod;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Drive one HTTP request at a target concurrently and report latency and throughput."
)]
pub struct LoadArgs {
    /// Target URL
    #[arg(long, short)]
    pub url: Option<String>,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Read the request body from a file
    #[arg(long = "data-file")]
    pub data_file: Option<PathBuf>,

    /// Number of parallel workers (0 is treated as 1)
    #[arg(long, short = 'c', default_value_t = 10)]
    pub concurrency: usize,

    /// Total number of requests to send
    #[arg(long, short = 'n')]
    pub requests: Option<u64>,

    /// Keep sending for this long instead of a fixed count (supports ms/s/m/h)
    #[arg(long, short = 't', value_parser = parse_duration_arg)]
    pub duration: Option<Duration>,

    /// Spread worker start-up linearly over this window (supports ms/s/m/h)
    #[arg(long = "ramp-up", value_parser = parse_duration_arg)]
    pub ramp_up: Option<Duration>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long, default_value = "30s", value_parser = parse_positive_duration_arg)]
    pub timeout: Duration,

    /// Connection timeout (supports ms/s/m/h)
    #[arg(long = "connect-timeout", default_value = "10s", value_parser = parse_positive_duration_arg)]
    pub connect_timeout: Duration,

    /// Maximum redirects to follow (0 disables)
    #[arg(long = "redirect", default_value_t = 10)]
    pub redirect_limit: u32,

    /// Accept invalid TLS certificates and hostnames
    #[arg(long, short = 'k')]
    pub insecure: bool,

    /// Path to a TOML or JSON config file
    #[arg(long)]
    pub config: Option<String>,

    /// Write the full result as JSON to this path
    #[arg(long = "json")]
    pub json_path: Option<PathBuf>,

    /// Disable the progress line
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}
