use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{LoadArgs, parse_header};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, DurationValue, RequestConfig};

/// Applies configuration values to CLI arguments.
///
/// Only arguments the user did not pass on the command line are touched.
///
/// # Errors
///
/// Returns an error when config values are invalid or conflict with each
/// other.
pub fn apply_config(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if let Some(request) = config.request.as_ref() {
        apply_request_config(args, matches, request)?;
    }

    if !is_cli(matches, "concurrency")
        && let Some(concurrency) = config.concurrency
    {
        args.concurrency = concurrency;
    }

    // Count and duration size the same workload; choosing either on the
    // command line overrides both config keys.
    if !is_cli(matches, "requests") && !is_cli(matches, "duration") {
        if let Some(requests) = config.requests {
            args.requests = Some(requests);
        }
        if let Some(duration) = config.duration.as_ref() {
            args.duration = Some(to_duration(duration, "duration")?);
        }
    }

    if !is_cli(matches, "ramp_up")
        && let Some(ramp_up) = config.ramp_up.as_ref()
    {
        args.ramp_up = Some(to_duration(ramp_up, "ramp_up")?);
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = to_positive_duration(timeout, "timeout")?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = to_positive_duration(timeout, "connect_timeout")?;
    }

    if !is_cli(matches, "insecure")
        && let Some(insecure) = config.insecure
    {
        args.insecure = insecure;
    }

    if !is_cli(matches, "redirect_limit")
        && let Some(redirect) = config.redirect
    {
        args.redirect_limit = redirect;
    }

    Ok(())
}

fn apply_request_config(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    request: &RequestConfig,
) -> AppResult<()> {
    if request.body.is_some() && request.body_file.is_some() {
        return Err(AppError::config(ConfigError::Conflict {
            left: "request.body",
            right: "request.body_file",
        }));
    }

    if !is_cli(matches, "method")
        && let Some(method) = request.method
    {
        args.method = method;
    }

    if !is_cli(matches, "url")
        && let Some(url) = request.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = request.headers.as_ref()
    {
        args.headers = parse_headers(headers)?;
    }

    // The body is one setting with two spellings; either CLI flag overrides
    // both config keys.
    if !is_cli(matches, "data") && !is_cli(matches, "data_file") {
        if let Some(body) = request.body.clone() {
            args.data = Some(body);
        }
        if let Some(path) = request.body_file.as_ref() {
            args.data_file = Some(PathBuf::from(path));
        }
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn parse_headers(headers: &[String]) -> AppResult<Vec<(String, String)>> {
    let mut parsed = Vec::with_capacity(headers.len());
    for header in headers {
        parsed.push(
            parse_header(header)
                .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
        );
    }
    Ok(parsed)
}

fn to_duration(value: &DurationValue, field: &'static str) -> AppResult<Duration> {
    value
        .to_duration()
        .map_err(|err| AppError::config(ConfigError::InvalidDuration { field, source: err }))
}

fn to_positive_duration(value: &DurationValue, field: &'static str) -> AppResult<Duration> {
    let duration = to_duration(value, field)?;
    if duration.is_zero() {
        return Err(AppError::config(ConfigError::InvalidDuration {
            field,
            source: ValidationError::DurationZero,
        }));
    }
    Ok(duration)
}
