//! Handler bodies shared by every entity kind.
//!
//! Each route module declares its own annotated handlers for routing and
//! OpenAPI, then delegates here so both kinds answer identically.

use actix_web::{HttpResponse, web};
use pagination::{PageParams, PageRequest, Paginated};
use serde_json::json;

use super::ApiResult;
use crate::domain::{DocumentId, Entity, EntityRepository, EntitySchema, Error, Filter};

/// Parse a path identifier. Blank identifiers name no record.
pub(crate) fn document_id<S: EntitySchema>(raw: String) -> ApiResult<DocumentId> {
    DocumentId::new(raw).map_err(|_| Error::not_found(format!("{} não encontrado", S::LABEL)))
}

/// Validate pagination parameters.
pub(crate) fn page_request(params: PageParams) -> ApiResult<PageRequest> {
    params.normalise().map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "page": params.page,
            "page_size": params.page_size,
        }))
    })
}

pub(crate) async fn create<S: EntitySchema>(
    repo: &EntityRepository<S>,
    draft: S::Draft,
) -> ApiResult<HttpResponse> {
    let entity = repo.create(draft).await?;
    Ok(HttpResponse::Created().json(entity))
}

pub(crate) async fn fetch<S: EntitySchema>(
    repo: &EntityRepository<S>,
    raw_id: String,
) -> ApiResult<web::Json<Entity<S::Fields>>> {
    let id = document_id::<S>(raw_id)?;
    repo.get_by_id(&id).await.map(web::Json)
}

pub(crate) async fn list<S: EntitySchema>(
    repo: &EntityRepository<S>,
    filter: &Filter,
    params: PageParams,
) -> ApiResult<web::Json<Paginated<Entity<S::Fields>>>> {
    let request = page_request(params)?;
    let items = repo.list(filter, request).await?;
    let total = repo.count(filter).await?;
    Ok(web::Json(Paginated::new(items, total, request)))
}

pub(crate) async fn update<S: EntitySchema>(
    repo: &EntityRepository<S>,
    raw_id: String,
    patch: S::Draft,
) -> ApiResult<web::Json<Entity<S::Fields>>> {
    let id = document_id::<S>(raw_id)?;
    repo.update(&id, patch).await.map(web::Json)
}

pub(crate) async fn remove<S: EntitySchema>(
    repo: &EntityRepository<S>,
    raw_id: String,
) -> ApiResult<HttpResponse> {
    let id = document_id::<S>(raw_id)?;
    repo.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
