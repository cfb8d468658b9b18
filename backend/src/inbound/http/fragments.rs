//! HTMX fragments shared by both frontend modes.
//!
//! Fragments always answer 200 so HTMX swaps them in; store failures render
//! as an inline notice instead of an error envelope.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use chrono::Local;
use minijinja::context;
use pagination::{MAX_PAGE_SIZE, PageRequest};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ApiResult;
use super::health::store_reachable;
use super::state::HttpState;
use super::templates::{Templates, names};
use crate::domain::{Entity, Error, Filter, ParcelFields};

const DEFAULT_LIST_LIMIT: u32 = 10;

/// Query accepted by `/terrenos-list`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListLimit {
    /// Number of parcels to show; defaults to 10.
    pub limit: Option<u32>,
}

impl ListLimit {
    fn page(self) -> ApiResult<PageRequest> {
        let size = self
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_PAGE_SIZE);
        PageRequest::new(1, size).map_err(|err| Error::invalid_request(err.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct ParcelRow {
    matricula: String,
    local: String,
    area: String,
    tipo_lote: &'static str,
    criado_em: String,
}

impl From<&Entity<ParcelFields>> for ParcelRow {
    fn from(parcel: &Entity<ParcelFields>) -> Self {
        Self {
            matricula: parcel.fields.matricula.clone(),
            local: format!("{}/{}", parcel.fields.municipio, parcel.fields.estado),
            area: format!("{:.2}", parcel.fields.area),
            tipo_lote: parcel.fields.tipo_lote.label(),
            criado_em: parcel.created_at.format("%d/%m/%Y").to_string(),
        }
    }
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

/// Status badges for the API and the document store.
#[get("/health-status")]
pub async fn health_status(
    state: web::Data<HttpState>,
    templates: web::Data<Templates>,
) -> ApiResult<HttpResponse> {
    let mongo = store_reachable(&state).await;
    templates
        .render(
            names::HEALTH_STATUS,
            context! {
                mongo => mongo,
                checked_at => Local::now().format("%H:%M:%S").to_string(),
            },
        )
        .map(html)
}

/// Table of the most recently registered parcels.
#[get("/terrenos-list")]
pub async fn parcel_list(
    state: web::Data<HttpState>,
    templates: web::Data<Templates>,
    query: web::Query<ListLimit>,
) -> ApiResult<HttpResponse> {
    let request = query.into_inner().page()?;
    let latest = state.parcels.list(&Filter::new(), request).await;
    let (rows, failed): (Vec<ParcelRow>, bool) = match latest {
        Ok(parcels) => (parcels.iter().map(ParcelRow::from).collect(), false),
        Err(err) => {
            warn!(error = %err, "parcel list fragment degraded");
            (Vec::new(), true)
        }
    };
    templates
        .render(
            names::PARCEL_LIST,
            context! { terrenos => rows, failed => failed },
        )
        .map(html)
}

/// Register the fragment routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_status).service(parcel_list);
}
