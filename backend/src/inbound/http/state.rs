//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain types and the store port, and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::DocumentStore;
use crate::domain::{ParcelRepository, ProjectRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Project register.
    pub projects: ProjectRepository,
    /// Parcel register.
    pub parcels: ParcelRepository,
    /// Store handle used by health checks.
    pub store: Arc<dyn DocumentStore>,
}

impl HttpState {
    /// Build both repositories over one store and clock.
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            projects: ProjectRepository::new(store.clone(), clock.clone()),
            parcels: ParcelRepository::new(store.clone(), clock),
            store,
        }
    }
}
