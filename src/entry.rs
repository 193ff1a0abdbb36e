use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::info;

use crate::args::LoadArgs;
use crate::error::{AppError, AppResult, HttpError, ValidationError};
use crate::http::{ClientSettings, RequestSpec, ReqwestTransport};
use crate::loadtest::{LoadTestConfig, LoadTester};
use crate::report::{ProgressLine, export_json, finish_progress_line, print_summary};
use crate::shutdown::{setup_signal_shutdown_handler, shutdown_channel};

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<Option<(LoadArgs, ArgMatches)>> {
    let mut cmd = LoadArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = LoadArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

/// A bare `volley` prints help unless a default config file can drive the run.
fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !crate::config::DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(mut args: LoadArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(&mut args, matches, &config)?;
    }

    let request = build_request(&args).await?;
    request.validate().map_err(|err| {
        tracing::error!("{}", err);
        AppError::http(err)
    })?;
    let transport = ReqwestTransport::new(&client_settings(&args)).map_err(AppError::http)?;
    let load_config = LoadTestConfig {
        concurrency: args.concurrency,
        total_requests: args.requests,
        duration: args.duration,
        ramp_up: args.ramp_up,
    };

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let mut tester = LoadTester::new(transport).with_shutdown(shutdown_rx);
    let progress = if args.no_progress {
        None
    } else {
        ProgressLine::for_stderr(args.no_color)
    };
    let show_progress = progress.is_some();
    if let Some(mut line) = progress {
        tester = tester.with_progress(move |completed, total| line.update(completed, total));
    }

    let outcome = tester.run(request.clone(), &load_config).await;

    drop(shutdown_tx.send(()));
    signal_handle.await?;

    let result = outcome.map_err(|err| {
        tracing::error!("{}", err);
        AppError::load_test(err)
    })?;

    if show_progress {
        finish_progress_line(result.total, args.no_color);
    }
    print_summary(&result, &request);

    if let Some(path) = args.json_path.as_deref() {
        export_json(path, &result).await?;
        info!("Wrote JSON result to {}", path.display());
    }

    Ok(())
}

async fn build_request(args: &LoadArgs) -> AppResult<RequestSpec> {
    let Some(url) = args.url.as_deref() else {
        tracing::error!("Missing URL (set --url or provide [request].url in config).");
        return Err(AppError::validation(ValidationError::MissingUrl));
    };

    let mut request = RequestSpec::new(args.method, url);
    for (key, value) in &args.headers {
        request = request.with_header(key.as_str(), value.as_str());
    }
    if let Some(body) = resolve_body(args).await? {
        request = request.with_body(body);
    }
    Ok(request)
}

async fn resolve_body(args: &LoadArgs) -> AppResult<Option<String>> {
    match (args.data.as_ref(), args.data_file.as_ref()) {
        (Some(_), Some(_)) => Err(AppError::validation(
            ValidationError::DataAndDataFileConflict,
        )),
        (Some(data), None) => Ok(Some(data.clone())),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .map(Some)
            .map_err(|err| {
                AppError::http(HttpError::ReadBodyFile {
                    path: path.clone(),
                    source: err,
                })
            }),
        (None, None) => Ok(None),
    }
}

fn client_settings(args: &LoadArgs) -> ClientSettings {
    ClientSettings {
        timeout: args.timeout,
        connect_timeout: args.connect_timeout,
        redirect_limit: args.redirect_limit,
        insecure: args.insecure,
        ..ClientSettings::default()
    }
}
