//! Domain primitives, schemas and the generic repository.
//!
//! Purpose: define the entity kinds stored by the AECO register, the rules
//! that make a record valid, and the lifecycle applied to every write. Types
//! here are transport agnostic; adapters in `inbound` and `outbound` translate
//! them to HTTP, HTML and MongoDB.
//!
//! Public surface:
//! - Error / ErrorCode — error payload and stable identifiers.
//! - EntitySchema / Entity / DocumentId — per-kind contract and record envelope.
//! - ProjectKind / ParcelKind — the two registered entity kinds.
//! - EntityRepository — validated CRUD over the document store port.
//! - Filter / FindWindow / SortKey — store-agnostic query model.
//! - ParcelSummary — register-wide parcel statistics.

pub mod entity;
pub mod error;
pub mod listing;
pub mod parcel;
pub mod parcel_summary;
pub mod ports;
pub mod project;
pub mod query;
pub mod repository;
pub mod trace_id;
pub mod validation;

pub use self::entity::{DocumentId, EmptyDocumentId, Entity, EntitySchema};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::listing::{ParcelQuery, ProjectQuery};
pub use self::parcel::{LotType, ParcelDraft, ParcelFields, ParcelKind, ZONES, normalise_zone};
pub use self::parcel_summary::ParcelSummary;
pub use self::project::{ProjectDraft, ProjectFields, ProjectKind, Typology};
pub use self::query::{Condition, Document, FieldCondition, Filter, FindWindow, SortDirection, SortKey};
pub use self::repository::EntityRepository;
pub use self::trace_id::TraceId;
pub use self::validation::{FieldViolation, ViolationCode, Violations};

/// Repository for projects.
pub type ProjectRepository = EntityRepository<ProjectKind>;
/// Repository for land parcels.
pub type ParcelRepository = EntityRepository<ParcelKind>;
