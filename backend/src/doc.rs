//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every JSON endpoint of the inbound HTTP layer and the
//! schema wrappers from [`crate::inbound::http::schemas`], which describe
//! domain types without coupling them to utoipa. HTML pages and HTMX
//! fragments are not part of the document.
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::health::{HealthReport, HealthStatus};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, LotTypeSchema, ParcelInputSchema, ParcelPageSchema,
    ParcelSchema, ParcelSummarySchema, ProjectInputSchema, ProjectPageSchema, ProjectSchema,
    TypologySchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sistema AECO backend API",
        description = "Registro de projetos e terrenos (formulário de terrenos) com health checks."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::replace_project,
        crate::inbound::http::projects::patch_project,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::parcels::create_parcel,
        crate::inbound::http::parcels::list_parcels,
        crate::inbound::http::parcels::parcel_summary,
        crate::inbound::http::parcels::get_parcel,
        crate::inbound::http::parcels::replace_parcel,
        crate::inbound::http::parcels::patch_parcel,
        crate::inbound::http::parcels::delete_parcel,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ProjectInputSchema,
        ProjectSchema,
        ProjectPageSchema,
        TypologySchema,
        ParcelInputSchema,
        ParcelSchema,
        ParcelPageSchema,
        ParcelSummarySchema,
        LotTypeSchema,
        HealthReport,
        HealthStatus,
    )),
    tags(
        (name = "projetos", description = "Project register"),
        (name = "terrenos", description = "Land parcel register and statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
