//! Land parcel endpoints under `/formulario-terrenos-projetos`.
//!
//! `GET /formulario-terrenos-projetos` is shared with the HTML form page;
//! page routes claim requests that accept `text/html` and must therefore be
//! registered first.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use pagination::{PageParams, Paginated};

use super::ApiResult;
use super::resource;
use super::schemas::{
    ErrorSchema, ParcelInputSchema, ParcelPageSchema, ParcelSchema, ParcelSummarySchema,
};
use super::state::HttpState;
use crate::domain::{Entity, Filter, ParcelDraft, ParcelFields, ParcelQuery, ParcelSummary};

/// Register a land parcel.
#[utoipa::path(
    post,
    path = "/formulario-terrenos-projetos",
    request_body = ParcelInputSchema,
    responses(
        (status = 201, description = "Parcel registered", body = ParcelSchema),
        (status = 400, description = "Malformed JSON", body = ErrorSchema),
        (status = 422, description = "Invalid fields", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["terrenos"],
    operation_id = "createParcel"
)]
#[post("/formulario-terrenos-projetos")]
pub async fn create_parcel(
    state: web::Data<HttpState>,
    payload: web::Json<ParcelDraft>,
) -> ApiResult<HttpResponse> {
    resource::create(&state.parcels, payload.into_inner()).await
}

/// List parcels, newest first.
#[utoipa::path(
    get,
    path = "/formulario-terrenos-projetos",
    params(
        ("page" = Option<u32>, Query, description = "One-based page number"),
        ("page_size" = Option<u32>, Query, description = "Items per page, capped at 100"),
        ("search" = Option<String>, Query, description = "Free text over registration, municipality, neighbourhood and street"),
        ("municipio" = Option<String>, Query, description = "Exact municipality"),
        ("estado" = Option<String>, Query, description = "State code, any case"),
        ("bairro" = Option<String>, Query, description = "Exact neighbourhood"),
        ("tipo_lote" = Option<String>, Query, description = "Lot type label, any case"),
        ("zona" = Option<String>, Query, description = "Zone code, any case"),
        ("matricula" = Option<String>, Query, description = "Registration number fragment"),
        ("area_min" = Option<f64>, Query, description = "Minimum area in m²"),
        ("area_max" = Option<f64>, Query, description = "Maximum area in m²")
    ),
    responses(
        (status = 200, description = "Page of parcels", body = ParcelPageSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["terrenos"],
    operation_id = "listParcels"
)]
#[get("/formulario-terrenos-projetos")]
pub async fn list_parcels(
    state: web::Data<HttpState>,
    page: web::Query<PageParams>,
    query: web::Query<ParcelQuery>,
) -> ApiResult<web::Json<Paginated<Entity<ParcelFields>>>> {
    resource::list(&state.parcels, &query.to_filter(), page.into_inner()).await
}

/// Aggregate statistics over every registered parcel.
#[utoipa::path(
    get,
    path = "/formulario-terrenos-projetos/stats/summary",
    responses(
        (status = 200, description = "Register statistics", body = ParcelSummarySchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["terrenos"],
    operation_id = "parcelSummary"
)]
#[get("/formulario-terrenos-projetos/stats/summary")]
pub async fn parcel_summary(state: web::Data<HttpState>) -> ApiResult<web::Json<ParcelSummary>> {
    let parcels = state.parcels.all(&Filter::new()).await?;
    Ok(web::Json(ParcelSummary::from_parcels(&parcels)))
}

/// Fetch one parcel.
#[utoipa::path(
    get,
    path = "/formulario-terrenos-projetos/{id}",
    params(("id" = String, Path, description = "Parcel identifier")),
    responses(
        (status = 200, description = "Parcel", body = ParcelSchema),
        (status = 404, description = "Unknown parcel", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["terrenos"],
    operation_id = "getParcel"
)]
#[get("/formulario-terrenos-projetos/{id}")]
pub async fn get_parcel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Entity<ParcelFields>>> {
    resource::fetch(&state.parcels, path.into_inner()).await
}

/// Replace a parcel's provided fields.
#[utoipa::path(
    put,
    path = "/formulario-terrenos-projetos/{id}",
    params(("id" = String, Path, description = "Parcel identifier")),
    request_body = ParcelInputSchema,
    responses(
        (status = 200, description = "Parcel updated", body = ParcelSchema),
        (status = 404, description = "Unknown parcel", body = ErrorSchema),
        (status = 422, description = "Invalid fields", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["terrenos"],
    operation_id = "replaceParcel"
)]
#[put("/formulario-terrenos-projetos/{id}")]
pub async fn replace_parcel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ParcelDraft>,
) -> ApiResult<web::Json<Entity<ParcelFields>>> {
    resource::update(&state.parcels, path.into_inner(), payload.into_inner()).await
}

/// Merge provided fields into a parcel.
#[utoipa::path(
    patch,
    path = "/formulario-terrenos-projetos/{id}",
    params(("id" = String, Path, description = "Parcel identifier")),
    request_body = ParcelInputSchema,
    responses(
        (status = 200, description = "Parcel updated", body = ParcelSchema),
        (status = 404, description = "Unknown parcel", body = ErrorSchema),
        (status = 422, description = "Invalid fields", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["terrenos"],
    operation_id = "patchParcel"
)]
#[patch("/formulario-terrenos-projetos/{id}")]
pub async fn patch_parcel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ParcelDraft>,
) -> ApiResult<web::Json<Entity<ParcelFields>>> {
    resource::update(&state.parcels, path.into_inner(), payload.into_inner()).await
}

/// Delete a parcel.
#[utoipa::path(
    delete,
    path = "/formulario-terrenos-projetos/{id}",
    params(("id" = String, Path, description = "Parcel identifier")),
    responses(
        (status = 204, description = "Parcel deleted"),
        (status = 404, description = "Unknown parcel", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["terrenos"],
    operation_id = "deleteParcel"
)]
#[delete("/formulario-terrenos-projetos/{id}")]
pub async fn delete_parcel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    resource::remove(&state.parcels, path.into_inner()).await
}

/// Register the parcel routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_parcel)
        .service(list_parcels)
        .service(parcel_summary)
        .service(get_parcel)
        .service(replace_parcel)
        .service(patch_parcel)
        .service(delete_parcel);
}
