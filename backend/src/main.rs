//! Backend entry-point: loads settings, connects the store and serves the
//! JSON API, HTML pages, HTMX fragments and OpenAPI docs.

mod server;

use std::io;

use actix_web::web;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::pages::{PageAssets, PageRoutes};
use backend::inbound::http::templates::Templates;
use backend::outbound::persistence::connect_document_store;
use backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = AppSettings::from_process()
        .and_then(|settings| settings.resolve())
        .map_err(io::Error::other)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }

    info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        frontend_mode = %config.frontend_mode,
        database = %config.database_name,
        "starting AECO backend"
    );

    let store = connect_document_store(&config.mongodb_uri, &config.database_name)
        .await
        .map_err(|err| io::Error::other(format!("connect document store: {err}")))?;
    if let Err(err) = store.ping().await {
        warn!(error = %err, "document store unreachable at startup; serving degraded");
    }

    let templates = web::Data::new(
        Templates::new().map_err(|err| io::Error::other(format!("compile templates: {err}")))?,
    );
    let pages = PageRoutes::build(
        config.frontend_mode,
        PageAssets {
            templates: templates.clone(),
            static_dir: config.static_dir.clone(),
            api_base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
        },
    )
    .map_err(io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(config.bind_addr, store, templates, pages),
    )?;

    let outcome = server.await;
    health_state.mark_unhealthy();
    match &outcome {
        Ok(()) => info!("AECO backend stopped"),
        Err(err) => error!(error = %err, "AECO backend stopped with an error"),
    }
    outcome
}
