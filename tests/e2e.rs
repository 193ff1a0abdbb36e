mod support;

use std::fs;

use tempfile::tempdir;

use support::{closed_port_url, describe, run_volley, spawn_http_server_or_skip};

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn e2e_count_run_prints_summary() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };

    let output = run_volley(["-u", url.as_str(), "-n", "20", "-c", "4", "--no-progress"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = stdout_of(&output);
    for expected in ["Requests:      20", "Successful:    20 (100.00%)", "  200: 20"] {
        if !stdout.contains(expected) {
            return Err(format!("Missing '{}'\n{}", expected, describe(&output)));
        }
    }
    Ok(())
}

#[test]
fn e2e_server_errors_are_completed_requests() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let target = format!("{}/fail", url);

    let output = run_volley(["-u", target.as_str(), "-n", "5", "-c", "2", "--no-progress"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = stdout_of(&output);
    for expected in ["Failed:        0 (0.00%)", "  500: 5"] {
        if !stdout.contains(expected) {
            return Err(format!("Missing '{}'\n{}", expected, describe(&output)));
        }
    }
    Ok(())
}

#[test]
fn e2e_refused_connections_are_failures() -> Result<(), String> {
    let url = closed_port_url()?;

    let output = run_volley(["-u", url.as_str(), "-n", "3", "-c", "1", "--no-progress"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = stdout_of(&output);
    for expected in ["Failed:        3 (100.00%)", "No responses received.", "Errors"] {
        if !stdout.contains(expected) {
            return Err(format!("Missing '{}'\n{}", expected, describe(&output)));
        }
    }
    Ok(())
}

#[test]
fn e2e_duration_run_completes() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };

    let output = run_volley(["-u", url.as_str(), "-t", "300ms", "-c", "2", "--no-progress"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    if !stdout_of(&output).contains("Failed:        0") {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_missing_workload_fails() -> Result<(), String> {
    let url = closed_port_url()?;

    let output = run_volley(["-u", url.as_str(), "-n", "0", "--no-progress"])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", describe(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("positive request count") {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_missing_url_fails() -> Result<(), String> {
    let output = run_volley(["-n", "1", "--no-progress"])?;
    if output.status.success() {
        return Err(format!("Expected failure\n{}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_json_export() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let json_path = dir.path().join("result.json");
    let json_arg = json_path.to_string_lossy().into_owned();

    let output = run_volley([
        "-u",
        url.as_str(),
        "-n",
        "6",
        "-c",
        "3",
        "--no-progress",
        "--json",
        json_arg.as_str(),
    ])?;
    if !output.status.success() {
        return Err(describe(&output));
    }

    let content =
        fs::read_to_string(&json_path).map_err(|err| format!("read export failed: {}", err))?;
    let json: serde_json::Value =
        serde_json::from_str(&content).map_err(|err| format!("parse export failed: {}", err))?;
    if json.get("total").and_then(serde_json::Value::as_u64) != Some(6) {
        return Err(format!("Unexpected total in {}", json));
    }
    let timings = json
        .get("timings_us")
        .and_then(serde_json::Value::as_array)
        .map(Vec::len);
    if timings != Some(6) {
        return Err(format!("Unexpected timings in {}", json));
    }
    Ok(())
}

#[test]
fn e2e_config_file_drives_run() -> Result<(), String> {
    let Some((url, _server)) = spawn_http_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config_path = dir.path().join("volley.toml");
    let config = format!(
        "concurrency = 2\nrequests = 4\n\n[request]\nmethod = \"post\"\nurl = \"{}\"\nbody = \"ping\"\n",
        url
    );
    fs::write(&config_path, config).map_err(|err| format!("write config failed: {}", err))?;
    let config_arg = config_path.to_string_lossy().into_owned();

    let output = run_volley(["--config", config_arg.as_str(), "--no-progress"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = stdout_of(&output);
    for expected in ["POST ", "Requests:      4"] {
        if !stdout.contains(expected) {
            return Err(format!("Missing '{}'\n{}", expected, describe(&output)));
        }
    }
    Ok(())
}
