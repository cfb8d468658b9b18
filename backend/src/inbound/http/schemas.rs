//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain
//! counterparts but live in the inbound adapter layer where framework
//! concerns belong.

#![expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]

use std::collections::BTreeMap;

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed (bad JSON, bad query string).
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The payload parsed but its fields are missing or invalid.
    #[schema(rename = "validation_failed")]
    ValidationFailed,
    /// The requested record does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The document store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "validation_failed")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "dados de terreno inválidos")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, e.g. `{"fields": [{field, code, message}]}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Typology`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Typology)]
pub enum TypologySchema {
    #[schema(rename = "residencial")]
    Residencial,
    #[schema(rename = "comercial")]
    Comercial,
    #[schema(rename = "institucional")]
    Institucional,
    #[schema(rename = "mista")]
    Mista,
}

/// OpenAPI schema for [`crate::domain::LotType`].
#[derive(ToSchema)]
#[schema(as = crate::domain::LotType)]
pub enum LotTypeSchema {
    #[schema(rename = "Padrão")]
    Standard,
    #[schema(rename = "Esquina")]
    Corner,
    #[schema(rename = "Fundos")]
    Rear,
    #[schema(rename = "Meio")]
    Middle,
    #[schema(rename = "Esquina Divisa")]
    CornerBoundary,
    #[schema(rename = "Único na Quadra")]
    WholeBlock,
    #[schema(rename = "Outro")]
    Other,
}

/// OpenAPI schema for [`crate::domain::ProjectDraft`]: create and update
/// payload. Every member is optional on update.
#[derive(ToSchema)]
#[schema(as = crate::domain::ProjectDraft)]
pub struct ProjectInputSchema {
    #[schema(example = "Residência Alto da Boa Vista", max_length = 200)]
    nome: Option<String>,
    #[schema(max_length = 1000)]
    descricao: Option<String>,
    #[schema(max_length = 200)]
    responsavel: Option<String>,
    /// Case-insensitive typology label.
    #[schema(example = "residencial")]
    tipologia: Option<String>,
    #[schema(max_length = 1000)]
    observacoes_internas: Option<String>,
}

/// A stored project.
#[derive(ToSchema)]
#[schema(as = Project)]
pub struct ProjectSchema {
    #[schema(example = "65f1c0ffee0000000000beef")]
    id: String,
    nome: String,
    descricao: Option<String>,
    responsavel: Option<String>,
    tipologia: Option<TypologySchema>,
    observacoes_internas: Option<String>,
    #[schema(example = "2024-05-10T09:30:00.000000Z")]
    created_at: String,
    #[schema(example = "2024-05-10T09:30:00.000000Z")]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::ParcelDraft`]. Numeric members also
/// accept numeric text as posted by HTML forms.
#[derive(ToSchema)]
#[schema(as = crate::domain::ParcelDraft)]
pub struct ParcelInputSchema {
    #[schema(example = "MAT-12345", max_length = 50)]
    matricula: Option<String>,
    #[schema(example = "2024-05-10", format = Date)]
    data: Option<String>,
    #[schema(example = "Campinas")]
    municipio: Option<String>,
    #[schema(example = "SP")]
    estado: Option<String>,
    #[schema(example = "BRASIL")]
    pais: Option<String>,
    bairro: Option<String>,
    logradouro: Option<String>,
    numero: Option<String>,
    #[schema(example = "13025-000")]
    cep: Option<String>,
    #[schema(minimum = 3, maximum = 10)]
    lados_poligono: Option<u8>,
    /// One interior angle per side; form posts send `;`-separated text.
    angulos_internos: Option<Vec<f64>>,
    #[schema(example = "Esquina")]
    tipo_lote: Option<String>,
    #[schema(example = 450.0)]
    area: Option<f64>,
    #[schema(example = 15.5)]
    norte_verdadeiro: Option<f64>,
    #[schema(example = "ZC2")]
    zona: Option<String>,
    observacoes: Option<String>,
}

/// A stored land parcel.
#[derive(ToSchema)]
#[schema(as = Parcel)]
pub struct ParcelSchema {
    #[schema(example = "65f1c0ffee0000000000beef")]
    id: String,
    matricula: String,
    #[schema(format = Date)]
    data: String,
    municipio: String,
    estado: String,
    pais: String,
    bairro: String,
    logradouro: String,
    numero: String,
    /// Digits only.
    cep: String,
    lados_poligono: u8,
    angulos_internos: Option<Vec<f64>>,
    tipo_lote: LotTypeSchema,
    area: f64,
    norte_verdadeiro: f64,
    zona: String,
    observacoes: Option<String>,
    created_at: String,
    updated_at: String,
}

/// One page of projects.
#[derive(ToSchema)]
#[schema(as = ProjectPage)]
pub struct ProjectPageSchema {
    items: Vec<ProjectSchema>,
    total: u64,
    page: u32,
    page_size: u32,
    total_pages: u64,
}

/// One page of parcels.
#[derive(ToSchema)]
#[schema(as = ParcelPage)]
pub struct ParcelPageSchema {
    items: Vec<ParcelSchema>,
    total: u64,
    page: u32,
    page_size: u32,
    total_pages: u64,
}

/// OpenAPI schema for [`crate::domain::ParcelSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ParcelSummary)]
pub struct ParcelSummarySchema {
    total_terrenos: u64,
    area_total_m2: f64,
    /// Zero for an empty register.
    area_media_m2: f64,
    /// Null for an empty register.
    area_minima_m2: Option<f64>,
    area_maxima_m2: Option<f64>,
    /// Count per lot type label.
    tipos_lote: BTreeMap<String, u64>,
    /// Count per zone.
    zonas: BTreeMap<String, u64>,
}
