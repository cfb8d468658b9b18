//! HTTP inbound adapter exposing the JSON API, HTML pages and HTMX fragments.

pub mod error;
pub mod fragments;
pub mod health;
pub mod pages;
pub mod parcels;
pub mod projects;
mod resource;
pub mod schemas;
pub mod state;
pub mod templates;

pub use error::{ApiResult, json_config, query_config};

use actix_web::web;

/// Register the health, JSON and fragment routes.
///
/// Page routes are registered separately through
/// [`pages::PageRoutes::register`], before this call.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health)
        .service(health::ready)
        .service(health::live);
    projects::configure(cfg);
    parcels::configure(cfg);
    fragments::configure(cfg);
}
