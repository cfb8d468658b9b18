//! Document persistence adapters.
//!
//! Two adapters implement [`crate::domain::ports::DocumentStore`]:
//!
//! - **MongoDB** (`MongoDocumentStore`): production storage via the official
//!   driver, with a bounded server-selection timeout.
//! - **In-memory** (`InMemoryDocumentStore`): process-local storage for tests
//!   and for development runs configured with the `memory://` URI.
//!
//! Adapters only translate between JSON documents and the backend's native
//! representation. Validation and timestamps live in the domain repository.
//!
//! # Example
//!
//! ```no_run
//! use backend::outbound::persistence::connect_document_store;
//!
//! # async fn run() -> Result<(), backend::domain::ports::DocumentStoreError> {
//! let store = connect_document_store("memory://", "dev").await?;
//! store.ping().await?;
//! # Ok(())
//! # }
//! ```

mod in_memory_document_store;
mod mongo_document_store;

use std::sync::Arc;

pub use in_memory_document_store::InMemoryDocumentStore;
pub use mongo_document_store::{DEFAULT_SERVER_SELECTION_TIMEOUT, MongoConfig, MongoDocumentStore};

use crate::domain::ports::{DocumentStore, DocumentStoreError};

/// URI selecting the in-memory adapter.
pub const MEMORY_URI: &str = "memory://";

/// Build the adapter selected by `uri`.
///
/// # Errors
/// Returns [`DocumentStoreError`] when a MongoDB URI cannot be parsed.
pub async fn connect_document_store(
    uri: &str,
    database: &str,
) -> Result<Arc<dyn DocumentStore>, DocumentStoreError> {
    if uri.trim() == MEMORY_URI {
        return Ok(Arc::new(InMemoryDocumentStore::new()));
    }
    let store = MongoDocumentStore::connect(&MongoConfig::new(uri, database)).await?;
    Ok(Arc::new(store))
}
