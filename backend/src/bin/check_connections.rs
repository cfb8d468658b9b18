//! Check that the document store and the running API are reachable.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;

use backend::diagnostics::{API_TIMEOUT, run_checks};
use backend::settings::AppSettings;
use clap::Parser;
use ortho_config::OrthoConfig;
use reqwest::{Client, Url};
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `check-connections` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "check-connections",
    about = "Verify MongoDB and API connectivity and print a report",
    version
)]
struct CliArgs {
    /// API base URL. Falls back to `APP_BASE_URL`.
    #[arg(long = "api-url", value_name = "url")]
    api_url: Option<Url>,
    /// MongoDB connection string. Falls back to `APP_MONGODB_URI`.
    #[arg(long = "mongodb-uri", value_name = "uri")]
    mongodb_uri: Option<String>,
    /// Database name. Falls back to `APP_DATABASE_NAME`.
    #[arg(long = "database", value_name = "name")]
    database: Option<String>,
    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {err}");
    }

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("check-connections: {err}");
            ExitCode::from(2)
        }
    }
}

fn run() -> io::Result<bool> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    // Arguments belong to clap; settings come from the environment and files only.
    let config = AppSettings::load_from_iter([OsString::from("check-connections")])
        .map_err(|err| io::Error::other(format!("load settings: {err}")))?
        .resolve()
        .map_err(io::Error::other)?;

    let base_url = args.api_url.unwrap_or(config.base_url);
    let mongodb_uri = args.mongodb_uri.unwrap_or(config.mongodb_uri);
    let database = args.database.unwrap_or(config.database_name);

    let client = Client::builder()
        .timeout(API_TIMEOUT)
        .build()
        .map_err(|err| io::Error::other(format!("build HTTP client: {err}")))?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| io::Error::other(format!("create Tokio runtime: {err}")))?;
    let report = runtime.block_on(run_checks(&client, &base_url, &mongodb_uri, &database));

    if report.passed() {
        info!(api = %base_url, "all connection checks passed");
    } else {
        warn!(
            api = %base_url,
            failed = report.summary.failed,
            "connection checks failed"
        );
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|err| io::Error::other(format!("serialise report: {err}")))?;
        println!("{json}");
    } else {
        println!("{}", report.render_text());
    }
    Ok(report.passed())
}
