//! Application assembly shared by HTTP integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    test, web,
};
use backend::Trace;
use backend::domain::ports::DocumentStore;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::pages::{PageAssets, PageRoutes};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::templates::Templates;
use backend::inbound::http::{self, json_config, query_config};
use backend::settings::FrontendMode;
use backend::test_support::MutableClock;
use chrono::{DateTime, TimeZone, Utc};

/// Instant the test clock starts at.
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0)
        .single()
        .expect("valid start instant")
}

pub fn static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Build the full application over `store`, with pages in `mode`.
pub async fn init_app(
    mode: FrontendMode,
    store: Arc<dyn DocumentStore>,
    clock: Arc<MutableClock>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let templates = web::Data::new(Templates::new().expect("templates compile"));
    let pages = PageRoutes::build(
        mode,
        PageAssets {
            templates: templates.clone(),
            static_dir: static_dir(),
            api_base_url: String::new(),
        },
    )
    .expect("page routes build");
    let health = web::Data::new(HealthState::new());
    health.mark_ready();

    test::init_service(
        App::new()
            .app_data(health)
            .app_data(web::Data::new(HttpState::new(store, clock)))
            .app_data(templates)
            .app_data(json_config())
            .app_data(query_config())
            .wrap(Trace)
            .configure(|cfg| pages.register(cfg))
            .configure(http::configure),
    )
    .await
}
