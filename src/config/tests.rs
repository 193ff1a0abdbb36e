use super::{
    apply_config, load_config_file,
    types::{ConfigFile, DurationValue, RequestConfig},
};
use clap::{CommandFactory, FromArgMatches};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

use crate::args::{HttpMethod, LoadArgs};
use crate::error::{AppError, AppResult, ConfigError};

fn parse_with_matches(argv: &[&str]) -> AppResult<(LoadArgs, clap::ArgMatches)> {
    let matches = LoadArgs::command().try_get_matches_from(argv)?;
    let args = LoadArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn expect(ok: bool, message: &'static str) -> AppResult<()> {
    if ok {
        Ok(())
    } else {
        Err(AppError::config(message))
    }
}

#[test]
fn parse_toml_config_with_request_table() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("volley.toml");
    let content = r#"
concurrency = 4
requests = 200
ramp_up = "2s"
timeout = 5

[request]
method = "post"
url = "http://localhost:3000/items"
headers = ["Content-Type: application/json"]
body = '{"name":"volley"}'
"#;
    std::fs::write(&path, content)?;

    let config = load_config_file(&path)?;
    let request = config
        .request
        .as_ref()
        .ok_or_else(|| AppError::config("Expected [request] table"))?;
    expect(request.method == Some(HttpMethod::Post), "Unexpected method")?;
    expect(
        request.url.as_deref() == Some("http://localhost:3000/items"),
        "Unexpected url",
    )?;
    expect(
        request.body.as_deref() == Some(r#"{"name":"volley"}"#),
        "Unexpected body",
    )?;
    expect(config.concurrency == Some(4), "Unexpected concurrency")?;
    expect(config.requests == Some(200), "Unexpected requests")?;
    expect(
        matches!(config.ramp_up, Some(DurationValue::Text(ref text)) if text == "2s"),
        "Expected textual ramp_up",
    )?;
    expect(
        matches!(config.timeout, Some(DurationValue::Seconds(5))),
        "Expected numeric timeout",
    )?;
    Ok(())
}

#[test]
fn parse_json_config_with_request_table() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("volley.json");
    let content = r#"{
  "duration": "30s",
  "insecure": true,
  "redirect": 0,
  "request": { "url": "https://localhost:8443", "method": "head" }
}"#;
    std::fs::write(&path, content)?;

    let config = load_config_file(&path)?;
    let request = config
        .request
        .as_ref()
        .ok_or_else(|| AppError::config("Expected request object"))?;
    expect(request.method == Some(HttpMethod::Head), "Unexpected method")?;
    expect(config.insecure == Some(true), "Unexpected insecure")?;
    expect(config.redirect == Some(0), "Unexpected redirect")?;
    Ok(())
}

#[test]
fn load_config_rejects_unknown_extension() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("volley.yaml");
    std::fs::write(&path, "concurrency: 2")?;

    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => Ok(()),
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(_) => Err(AppError::config("Expected unsupported extension error")),
    }
}

#[test]
fn load_config_reports_parse_errors() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "concurrency = [")?;

    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::ParseToml { path: reported, .. }))
            if reported == path =>
        {
            Ok(())
        }
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(_) => Err(AppError::config("Expected a TOML parse error")),
    }
}

#[test]
fn apply_config_fills_unset_arguments() -> AppResult<()> {
    let (mut args, matches) = parse_with_matches(&["volley"])?;
    let config = ConfigFile {
        request: Some(RequestConfig {
            method: Some(HttpMethod::Put),
            url: Some("http://localhost:9000".to_owned()),
            headers: Some(vec!["X-Trace: abc".to_owned()]),
            body: Some("payload".to_owned()),
            body_file: None,
        }),
        concurrency: Some(0),
        requests: Some(50),
        duration: Some(DurationValue::Text("1m".to_owned())),
        ramp_up: Some(DurationValue::Seconds(3)),
        timeout: Some(DurationValue::Text("750ms".to_owned())),
        connect_timeout: None,
        insecure: Some(true),
        redirect: Some(2),
    };

    apply_config(&mut args, &matches, &config)?;

    expect(args.method == HttpMethod::Put, "Unexpected method")?;
    expect(
        args.url.as_deref() == Some("http://localhost:9000"),
        "Unexpected url",
    )?;
    expect(
        args.headers == vec![("X-Trace".to_owned(), "abc".to_owned())],
        "Unexpected headers",
    )?;
    expect(args.data.as_deref() == Some("payload"), "Unexpected body")?;
    expect(args.concurrency == 0, "Concurrency 0 must pass through")?;
    expect(args.requests == Some(50), "Unexpected requests")?;
    expect(
        args.duration == Some(Duration::from_secs(60)),
        "Unexpected duration",
    )?;
    expect(
        args.ramp_up == Some(Duration::from_secs(3)),
        "Unexpected ramp_up",
    )?;
    expect(
        args.timeout == Duration::from_millis(750),
        "Unexpected timeout",
    )?;
    expect(
        args.connect_timeout == Duration::from_secs(10),
        "connect_timeout should keep its default",
    )?;
    expect(args.insecure, "Expected insecure")?;
    expect(args.redirect_limit == 2, "Unexpected redirect limit")?;
    Ok(())
}

#[test]
fn apply_config_keeps_command_line_values() -> AppResult<()> {
    let (mut args, matches) = parse_with_matches(&[
        "volley",
        "-u",
        "http://cli.local",
        "-c",
        "3",
        "--timeout",
        "2s",
        "--data-file",
        "body.json",
    ])?;
    let config = ConfigFile {
        request: Some(RequestConfig {
            url: Some("http://config.local".to_owned()),
            body: Some("from config".to_owned()),
            ..RequestConfig::default()
        }),
        concurrency: Some(40),
        timeout: Some(DurationValue::Seconds(90)),
        ..ConfigFile::default()
    };

    apply_config(&mut args, &matches, &config)?;

    expect(args.url.as_deref() == Some("http://cli.local"), "CLI url lost")?;
    expect(args.concurrency == 3, "CLI concurrency lost")?;
    expect(args.timeout == Duration::from_secs(2), "CLI timeout lost")?;
    expect(
        args.data.is_none(),
        "Config body must not override --data-file",
    )?;
    expect(
        args.data_file == Some(PathBuf::from("body.json")),
        "CLI data file lost",
    )?;
    Ok(())
}

#[test]
fn cli_duration_displaces_config_request_count() -> AppResult<()> {
    let (mut args, matches) = parse_with_matches(&["volley", "-u", "http://x", "-t", "2s"])?;
    let config = ConfigFile {
        requests: Some(100),
        ..ConfigFile::default()
    };

    apply_config(&mut args, &matches, &config)?;

    expect(args.requests.is_none(), "Config requests overrode CLI duration")?;
    expect(
        args.duration == Some(Duration::from_secs(2)),
        "CLI duration lost",
    )?;
    Ok(())
}

#[test]
fn cli_request_count_displaces_config_duration() -> AppResult<()> {
    let (mut args, matches) = parse_with_matches(&["volley", "-u", "http://x", "-n", "5"])?;
    let config = ConfigFile {
        duration: Some(DurationValue::Seconds(30)),
        ..ConfigFile::default()
    };

    apply_config(&mut args, &matches, &config)?;

    expect(args.duration.is_none(), "Config duration overrode CLI requests")?;
    expect(args.requests == Some(5), "CLI requests lost")?;
    Ok(())
}

#[test]
fn config_workload_applies_without_cli_workload() -> AppResult<()> {
    let (mut args, matches) = parse_with_matches(&["volley", "-u", "http://x"])?;
    let config = ConfigFile {
        requests: Some(100),
        duration: Some(DurationValue::Seconds(30)),
        ..ConfigFile::default()
    };

    apply_config(&mut args, &matches, &config)?;

    expect(args.requests == Some(100), "Config requests ignored")?;
    expect(
        args.duration == Some(Duration::from_secs(30)),
        "Config duration ignored",
    )?;
    Ok(())
}

#[test]
fn apply_config_rejects_body_and_body_file() -> AppResult<()> {
    let (mut args, matches) = parse_with_matches(&["volley"])?;
    let config = ConfigFile {
        request: Some(RequestConfig {
            body: Some("inline".to_owned()),
            body_file: Some("body.json".to_owned()),
            ..RequestConfig::default()
        }),
        ..ConfigFile::default()
    };

    match apply_config(&mut args, &matches, &config) {
        Err(AppError::Config(ConfigError::Conflict { left, right }))
            if left == "request.body" && right == "request.body_file" =>
        {
            Ok(())
        }
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(()) => Err(AppError::config("Expected a conflict error")),
    }
}

#[test]
fn apply_config_rejects_zero_timeout() -> AppResult<()> {
    let (mut args, matches) = parse_with_matches(&["volley"])?;
    let config = ConfigFile {
        timeout: Some(DurationValue::Seconds(0)),
        ..ConfigFile::default()
    };

    match apply_config(&mut args, &matches, &config) {
        Err(AppError::Config(ConfigError::InvalidDuration { field, .. })) if field == "timeout" => {
            Ok(())
        }
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(()) => Err(AppError::config("Expected an invalid duration error")),
    }
}

#[test]
fn apply_config_rejects_malformed_header() -> AppResult<()> {
    let (mut args, matches) = parse_with_matches(&["volley"])?;
    let config = ConfigFile {
        request: Some(RequestConfig {
            headers: Some(vec!["no-colon-here".to_owned()]),
            ..RequestConfig::default()
        }),
        ..ConfigFile::default()
    };

    match apply_config(&mut args, &matches, &config) {
        Err(AppError::Config(ConfigError::InvalidHeader { .. })) => Ok(()),
        Err(err) => Err(AppError::config(format!("Unexpected error: {}", err))),
        Ok(()) => Err(AppError::config("Expected an invalid header error")),
    }
}
