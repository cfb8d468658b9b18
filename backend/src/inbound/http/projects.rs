//! Project endpoints under `/projetos`.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use pagination::{PageParams, Paginated};

use super::ApiResult;
use super::resource;
use super::schemas::{ErrorSchema, ProjectInputSchema, ProjectPageSchema, ProjectSchema};
use super::state::HttpState;
use crate::domain::{Entity, ProjectDraft, ProjectFields, ProjectQuery};

/// Create a project.
#[utoipa::path(
    post,
    path = "/projetos",
    request_body = ProjectInputSchema,
    responses(
        (status = 201, description = "Project created", body = ProjectSchema),
        (status = 400, description = "Malformed JSON", body = ErrorSchema),
        (status = 422, description = "Invalid fields", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["projetos"],
    operation_id = "createProject"
)]
#[post("/projetos")]
pub async fn create_project(
    state: web::Data<HttpState>,
    payload: web::Json<ProjectDraft>,
) -> ApiResult<HttpResponse> {
    resource::create(&state.projects, payload.into_inner()).await
}

/// List projects, newest first.
#[utoipa::path(
    get,
    path = "/projetos",
    params(
        ("page" = Option<u32>, Query, description = "One-based page number"),
        ("page_size" = Option<u32>, Query, description = "Items per page, capped at 100"),
        ("search" = Option<String>, Query, description = "Free text over name and description"),
        ("nome" = Option<String>, Query, description = "Case-insensitive name fragment"),
        ("responsavel" = Option<String>, Query, description = "Exact person in charge"),
        ("tipologia" = Option<String>, Query, description = "Typology label")
    ),
    responses(
        (status = 200, description = "Page of projects", body = ProjectPageSchema),
        (status = 400, description = "Invalid pagination", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["projetos"],
    operation_id = "listProjects"
)]
#[get("/projetos")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    page: web::Query<PageParams>,
    query: web::Query<ProjectQuery>,
) -> ApiResult<web::Json<Paginated<Entity<ProjectFields>>>> {
    resource::list(&state.projects, &query.to_filter(), page.into_inner()).await
}

/// Fetch one project.
#[utoipa::path(
    get,
    path = "/projetos/{id}",
    params(("id" = String, Path, description = "Project identifier")),
    responses(
        (status = 200, description = "Project", body = ProjectSchema),
        (status = 404, description = "Unknown project", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["projetos"],
    operation_id = "getProject"
)]
#[get("/projetos/{id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Entity<ProjectFields>>> {
    resource::fetch(&state.projects, path.into_inner()).await
}

/// Replace a project's provided fields.
#[utoipa::path(
    put,
    path = "/projetos/{id}",
    params(("id" = String, Path, description = "Project identifier")),
    request_body = ProjectInputSchema,
    responses(
        (status = 200, description = "Project updated", body = ProjectSchema),
        (status = 404, description = "Unknown project", body = ErrorSchema),
        (status = 422, description = "Invalid fields", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["projetos"],
    operation_id = "replaceProject"
)]
#[put("/projetos/{id}")]
pub async fn replace_project(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ProjectDraft>,
) -> ApiResult<web::Json<Entity<ProjectFields>>> {
    resource::update(&state.projects, path.into_inner(), payload.into_inner()).await
}

/// Merge provided fields into a project.
#[utoipa::path(
    patch,
    path = "/projetos/{id}",
    params(("id" = String, Path, description = "Project identifier")),
    request_body = ProjectInputSchema,
    responses(
        (status = 200, description = "Project updated", body = ProjectSchema),
        (status = 404, description = "Unknown project", body = ErrorSchema),
        (status = 422, description = "Invalid fields", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["projetos"],
    operation_id = "patchProject"
)]
#[patch("/projetos/{id}")]
pub async fn patch_project(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ProjectDraft>,
) -> ApiResult<web::Json<Entity<ProjectFields>>> {
    resource::update(&state.projects, path.into_inner(), payload.into_inner()).await
}

/// Delete a project.
#[utoipa::path(
    delete,
    path = "/projetos/{id}",
    params(("id" = String, Path, description = "Project identifier")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Unknown project", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["projetos"],
    operation_id = "deleteProject"
)]
#[delete("/projetos/{id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    resource::remove(&state.projects, path.into_inner()).await
}

/// Register the project routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_project)
        .service(list_projects)
        .service(get_project)
        .service(replace_project)
        .service(patch_project)
        .service(delete_project);
}
