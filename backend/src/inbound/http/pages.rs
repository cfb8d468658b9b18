//! Full HTML pages in either frontend mode.
//!
//! The mode is resolved once into a [`PageRoutes`] value whose variant decides
//! which handlers are registered. Both variants expose the same paths, form
//! field names and HTMX widgets.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_web::guard::{self, GuardContext};
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, web};
use cap_std::{ambient_authority, fs::Dir};
use minijinja::context;
use tracing::{error, info};

use super::ApiResult;
use super::templates::{Templates, names};
use crate::domain::{Error, LotType, ZONES};
use crate::settings::{ConfigError, FrontendMode};

/// Path shared by the parcel form page and the parcel collection.
pub const PARCEL_FORM_PATH: &str = "/formulario-terrenos-projetos";

const STATIC_DASHBOARD: &str = "index.html";
const STATIC_PARCEL_FORM: &str = "formulario_terrenos.html";

fn accepts_html(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// Pre-written pages read from a capability-scoped directory.
pub struct StaticPages {
    dir: Arc<Dir>,
}

impl StaticPages {
    /// Open the static directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::StaticDir`] when the directory cannot be opened.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| {
            ConfigError::StaticDir {
                path: path.display().to_string(),
                message: err.to_string(),
            }
        })?;
        Ok(Self { dir: Arc::new(dir) })
    }

    async fn serve(&self, file: &'static str) -> ApiResult<HttpResponse> {
        let dir = Arc::clone(&self.dir);
        let read = web::block(move || dir.read_to_string(file))
            .await
            .map_err(|err| {
                error!(file, error = %err, "static page read was cancelled");
                Error::internal("static page read failed")
            })?;
        match read {
            Ok(body) => Ok(html(body)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(Error::not_found(format!("página {file} não encontrada")))
            }
            Err(err) => {
                error!(file, error = %err, "static page unreadable");
                Err(Error::internal("static page read failed"))
            }
        }
    }
}

/// Pages rendered from the embedded templates.
pub struct TemplatedPages {
    templates: web::Data<Templates>,
    api_base_url: String,
}

impl TemplatedPages {
    fn serve(&self, name: &str) -> ApiResult<HttpResponse> {
        let lot_types: Vec<&str> = LotType::ALL.iter().map(|lot| lot.label()).collect();
        self.templates
            .render(
                name,
                context! {
                    frontend_mode => FrontendMode::Jinja.as_str(),
                    api_base_url => self.api_base_url.as_str(),
                    lot_types => lot_types,
                    zones => ZONES,
                },
            )
            .map(html)
    }
}

/// Inputs needed to build either page set.
pub struct PageAssets {
    /// Embedded template environment.
    pub templates: web::Data<Templates>,
    /// Directory holding the pre-written pages.
    pub static_dir: PathBuf,
    /// API base URL injected into rendered pages.
    pub api_base_url: String,
}

/// Page route set selected by the frontend mode.
#[derive(Clone)]
pub enum PageRoutes {
    /// Pages read once from the static directory.
    Static(web::Data<StaticPages>),
    /// Pages rendered from templates on each request.
    Templated(web::Data<TemplatedPages>),
}

impl PageRoutes {
    /// Resolve the mode into a route set.
    ///
    /// # Errors
    ///
    /// Static mode fails when the static directory cannot be opened.
    pub fn build(mode: FrontendMode, assets: PageAssets) -> Result<Self, ConfigError> {
        let routes = match mode {
            FrontendMode::Static => {
                Self::Static(web::Data::new(StaticPages::open(&assets.static_dir)?))
            }
            FrontendMode::Jinja => Self::Templated(web::Data::new(TemplatedPages {
                templates: assets.templates,
                api_base_url: assets.api_base_url,
            })),
        };
        info!(mode = %routes.mode(), "frontend pages configured");
        Ok(routes)
    }

    /// Mode this route set serves.
    pub fn mode(&self) -> FrontendMode {
        match self {
            Self::Static(_) => FrontendMode::Static,
            Self::Templated(_) => FrontendMode::Jinja,
        }
    }

    /// Add the page routes. Register before the JSON API so the form page
    /// claims browser requests to [`PARCEL_FORM_PATH`].
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        let form = || {
            web::resource(PARCEL_FORM_PATH)
                .guard(guard::Get())
                .guard(guard::fn_guard(accepts_html))
        };
        match self {
            Self::Static(pages) => {
                cfg.app_data(pages.clone())
                    .route("/", web::get().to(static_dashboard))
                    .route("/dashboard", web::get().to(static_dashboard))
                    .service(form().to(static_parcel_form));
            }
            Self::Templated(pages) => {
                cfg.app_data(pages.clone())
                    .route("/", web::get().to(rendered_dashboard))
                    .route("/dashboard", web::get().to(rendered_dashboard))
                    .service(form().to(rendered_parcel_form));
            }
        }
    }
}

async fn static_dashboard(pages: web::Data<StaticPages>) -> ApiResult<HttpResponse> {
    pages.serve(STATIC_DASHBOARD).await
}

async fn static_parcel_form(pages: web::Data<StaticPages>) -> ApiResult<HttpResponse> {
    pages.serve(STATIC_PARCEL_FORM).await
}

async fn rendered_dashboard(pages: web::Data<TemplatedPages>) -> ApiResult<HttpResponse> {
    pages.serve(names::DASHBOARD)
}

async fn rendered_parcel_form(pages: web::Data<TemplatedPages>) -> ApiResult<HttpResponse> {
    pages.serve(names::PARCEL_FORM)
}
