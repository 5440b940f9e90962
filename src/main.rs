//! `netresponse`: fetch a URL and print its classified result as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use reqwest::header::HeaderMap;
use serde_json::{json, Map, Value};

use netresponse::config::{load_config, ClientConfig};
use netresponse::observability::init_logging;
use netresponse::{Expect, NetworkClient, NetworkResult};

#[derive(Parser)]
#[command(name = "netresponse")]
#[command(about = "Fetch a URL and print the classified result", long_about = None)]
struct Cli {
    /// TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Retry on network errors using the configured policy.
    #[arg(short, long)]
    retry: bool,

    /// Override the number of attempts (implies --retry).
    #[arg(short, long)]
    times: Option<u32>,

    /// Emit JSON log lines.
    #[arg(long)]
    json_log: bool,

    /// URL to GET; resolved against `transport.base_url` when set.
    url: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if cli.json_log {
        config.observability.json = true;
    }
    if let Some(times) = cli.times {
        config.retry.times = times.max(1);
    }
    init_logging(&config.observability)?;

    let client = NetworkClient::from_config(&config)?;
    let expect = Expect::text();

    tracing::info!(url = %cli.url, retry = cli.retry || cli.times.is_some(), "Fetching");

    let result = if cli.retry || cli.times.is_some() {
        client.execute_with_retry(|c| c.get(&cli.url), &expect).await
    } else {
        client.execute(client.get(&cli.url), &expect).await
    };

    println!("{}", serde_json::to_string_pretty(&render(&result))?);

    Ok(if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn render(result: &NetworkResult<String, String>) -> Value {
    let mut out = json!({
        "result": result.kind(),
        "summary": result.to_string(),
    });
    if let Some(status) = result.status() {
        out["status"] = json!(status.as_u16());
    }
    if let Some(headers) = result.headers() {
        out["headers"] = render_headers(headers);
    }
    match result {
        NetworkResult::Success { body, .. } => out["body"] = json!(body),
        NetworkResult::ServerError { body, .. } => out["error_body"] = json!(body),
        NetworkResult::NetworkError { cause } => out["error"] = json!(cause.to_string()),
        NetworkResult::UnknownError { cause, .. } => out["error"] = json!(cause.to_string()),
    }
    out
}

fn render_headers(headers: &HeaderMap) -> Value {
    let mut map = Map::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        match map.get_mut(name.as_str()) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                map.insert(name.as_str().to_string(), Value::String(value));
            }
        }
    }
    Value::Object(map)
}
