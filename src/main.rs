//! reqlog: send one HTTP request through the logging middleware.
//!
//! ```text
//! reqlog [--config FILE] [-X METHOD] [-H "Name: value"]... [-d BODY]
//!        [--eager | --multi-phase] [--strict] [--format TEMPLATE] [--json] URL
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use clap::Parser;
use http::{Method, Request, Response};
use tower::{ServiceBuilder, ServiceExt};

use request_logger::config::{load_config, validate_config, AppConfig, ConfigError, LogMode};
use request_logger::observability::init_logging;
use request_logger::{LoggerLayer, ReqwestTransport, StatusTable, TracingSink};

#[derive(Parser)]
#[command(name = "reqlog")]
#[command(about = "Send an HTTP request and log it", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request header, `Name: value` (repeatable)
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Request body
    #[arg(short, long)]
    data: Option<String>,

    /// Log the request before sending it
    #[arg(long)]
    eager: bool,

    /// Log the request at DEBUG and the outcome, always both
    #[arg(long, conflicts_with = "eager")]
    multi_phase: bool,

    /// Use the strict status table (4xx ERROR, 5xx CRITICAL)
    #[arg(long)]
    strict: bool,

    /// Preset (clf, debug, short) or template
    #[arg(long)]
    format: Option<String>,

    /// Print status, headers and body as JSON
    #[arg(long)]
    json: bool,

    url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if cli.eager {
        config.middleware.eager_request_logging = true;
    }
    if cli.multi_phase {
        config.middleware.mode = LogMode::MultiPhase;
    }
    if cli.strict {
        config.middleware.status_table = StatusTable::Strict;
    }
    if let Some(format) = &cli.format {
        config.middleware.format = format.clone();
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.logging)?;

    tracing::debug!(
        mode = ?config.middleware.mode,
        status_table = ?config.middleware.status_table,
        format = %config.middleware.format,
        "Configuration loaded"
    );

    let layer = LoggerLayer::from_config(&config.middleware, Arc::new(TracingSink::new()))?;
    let transport = ReqwestTransport::from_config(&config.transport)?;
    let client = ServiceBuilder::new().layer(layer).service(transport);

    let response = client.oneshot(build_request(&cli)?).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary(&response))?);
    } else {
        println!("{}", String::from_utf8_lossy(response.body()));
    }
    Ok(())
}

fn summary(response: &Response<Bytes>) -> serde_json::Value {
    let headers: serde_json::Map<String, serde_json::Value> = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned().into(),
            )
        })
        .collect();

    serde_json::json!({
        "status": response.status().as_u16(),
        "headers": headers,
        "body": String::from_utf8_lossy(response.body()),
    })
}

fn build_request(cli: &Cli) -> Result<Request<Bytes>, Box<dyn std::error::Error>> {
    let method: Method = cli.method.to_uppercase().parse()?;
    let mut builder = Request::builder().method(method).uri(cli.url.as_str());

    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("invalid header `{}`, expected `Name: value`", header))?;
        builder = builder.header(name.trim(), value.trim());
    }

    let body = cli.data.clone().map(Bytes::from).unwrap_or_default();
    Ok(builder.body(body)?)
}
