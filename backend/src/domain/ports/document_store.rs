//! Driven port for schemaless document persistence.
//!
//! The repository layer talks to storage exclusively through this trait.
//! Production wires the MongoDB adapter; tests and `memory://` runs use the
//! in-process adapter.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Document, DocumentId, Filter, FindWindow};

define_port_error! {
    /// Failures surfaced by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached (server selection, network I/O).
        Connection { message: String } => "document store unreachable: {message}",
        /// The store rejected or failed to run an operation.
        Query { message: String } => "document store operation failed: {message}",
        /// A stored document could not be converted to or from JSON.
        Decode { message: String } => "stored document could not be decoded: {message}",
    }
}

/// A document together with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// Document fields without the identifier.
    pub body: Document,
}

/// Port for CRUD access to named document collections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its new identifier.
    async fn insert(&self, collection: &str, body: Document)
    -> Result<DocumentId, DocumentStoreError>;

    /// Fetch one document; `None` when absent or when the identifier cannot
    /// belong to this store.
    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError>;

    /// Fetch the documents matching `filter` within `window`.
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        window: &FindWindow,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError>;

    /// Overwrite the given top-level fields. Returns `false` when no document
    /// has this identifier.
    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        body: Document,
    ) -> Result<bool, DocumentStoreError>;

    /// Remove a document. Returns `false` when no document has this identifier.
    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, DocumentStoreError>;

    /// Count the documents matching `filter`.
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, DocumentStoreError>;

    /// Round-trip to the store to prove it is reachable.
    async fn ping(&self) -> Result<(), DocumentStoreError>;
}
