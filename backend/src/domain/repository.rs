//! Generic CRUD repository over the document store port.
//!
//! One [`EntityRepository`] is instantiated per entity kind. It owns the
//! record lifecycle rules: validation before every write, store-assigned
//! identifiers, immutable `created_at`, monotonic `updated_at` and
//! merge-on-update.

use std::collections::BTreeSet;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use pagination::PageRequest;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use super::entity::{Entity, EntitySchema, stored_precision, timestamp};
use super::ports::{DocumentStore, DocumentStoreError, StoredDocument};
use super::{Document, DocumentId, Error, Filter, FindWindow, SortKey};

const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

/// CRUD operations for one entity kind.
pub struct EntityRepository<S: EntitySchema> {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    schema: PhantomData<fn() -> S>,
}

impl<S: EntitySchema> Clone for EntityRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            schema: PhantomData,
        }
    }
}

impl<S: EntitySchema> EntityRepository<S> {
    /// Build a repository over the given store and clock.
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            schema: PhantomData,
        }
    }

    fn now(&self) -> DateTime<Utc> {
        stored_precision(self.clock.utc())
    }

    /// Validate a draft and store it as a new record.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::ValidationFailed`] when the draft is
    /// invalid; store failures otherwise.
    pub async fn create(&self, draft: S::Draft) -> Result<Entity<S::Fields>, Error> {
        let fields = S::validate(draft).map_err(|v| v.into_error(S::LABEL))?;
        let now = self.now();
        let mut body = to_document(&fields)?;
        insert_timestamps(&mut body, now, now);

        let id = self
            .store
            .insert(S::COLLECTION, body)
            .await
            .map_err(|err| store_error(S::COLLECTION, &err))?;
        debug!(collection = S::COLLECTION, id = %id, "record created");
        Ok(Entity {
            id,
            fields,
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetch one record.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when absent.
    pub async fn get_by_id(&self, id: &DocumentId) -> Result<Entity<S::Fields>, Error> {
        let stored = self
            .store
            .find_by_id(S::COLLECTION, id)
            .await
            .map_err(|err| store_error(S::COLLECTION, &err))?
            .ok_or_else(|| not_found::<S>(id))?;
        decode::<S>(stored)
    }

    /// Fetch one page of matching records, newest first.
    pub async fn list(
        &self,
        filter: &Filter,
        page: PageRequest,
    ) -> Result<Vec<Entity<S::Fields>>, Error> {
        let window = FindWindow::page(
            SortKey::descending(CREATED_AT),
            page.offset(),
            page.limit(),
        );
        self.find(filter, &window).await
    }

    /// Count matching records.
    pub async fn count(&self, filter: &Filter) -> Result<u64, Error> {
        self.store
            .count(S::COLLECTION, filter)
            .await
            .map_err(|err| store_error(S::COLLECTION, &err))
    }

    /// Fetch every matching record, newest first.
    pub async fn all(&self, filter: &Filter) -> Result<Vec<Entity<S::Fields>>, Error> {
        self.find(filter, &FindWindow::all(SortKey::descending(CREATED_AT)))
            .await
    }

    async fn find(
        &self,
        filter: &Filter,
        window: &FindWindow,
    ) -> Result<Vec<Entity<S::Fields>>, Error> {
        let documents = self
            .store
            .find_many(S::COLLECTION, filter, window)
            .await
            .map_err(|err| store_error(S::COLLECTION, &err))?;
        documents.into_iter().map(decode::<S>).collect()
    }

    /// Merge `patch` into the stored record, re-validate and persist.
    ///
    /// The merged record must validate, but only the fields present in the
    /// patch are written, so concurrent updates to other fields survive. An
    /// empty patch only refreshes `updated_at`.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when absent,
    /// [`crate::domain::ErrorCode::ValidationFailed`] when the merged record
    /// is invalid.
    pub async fn update(
        &self,
        id: &DocumentId,
        patch: S::Draft,
    ) -> Result<Entity<S::Fields>, Error> {
        let current = self.get_by_id(id).await?;
        let provided = provided_keys(&patch)?;
        let merged = S::merge(S::to_draft(&current.fields), patch);
        let fields = S::validate(merged).map_err(|v| v.into_error(S::LABEL))?;
        let updated_at = self.now().max(current.updated_at);

        let mut body = to_document(&fields)?;
        body.retain(|key, _| provided.contains(key));
        body.insert(
            UPDATED_AT.to_owned(),
            Value::String(timestamp::format(&updated_at)),
        );
        let matched = self
            .store
            .update(S::COLLECTION, id, body)
            .await
            .map_err(|err| store_error(S::COLLECTION, &err))?;
        if !matched {
            return Err(not_found::<S>(id));
        }
        debug!(
            collection = S::COLLECTION,
            id = %id,
            fields = provided.len(),
            "record updated"
        );
        self.get_by_id(id).await
    }

    /// Remove a record.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NotFound`] when absent.
    pub async fn delete(&self, id: &DocumentId) -> Result<(), Error> {
        let removed = self
            .store
            .delete(S::COLLECTION, id)
            .await
            .map_err(|err| store_error(S::COLLECTION, &err))?;
        if !removed {
            return Err(not_found::<S>(id));
        }
        debug!(collection = S::COLLECTION, id = %id, "record deleted");
        Ok(())
    }
}

fn insert_timestamps(body: &mut Document, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
    body.insert(
        CREATED_AT.to_owned(),
        Value::String(timestamp::format(&created_at)),
    );
    body.insert(
        UPDATED_AT.to_owned(),
        Value::String(timestamp::format(&updated_at)),
    );
}

/// Keys the client actually sent; unset draft fields serialise as `null`.
fn provided_keys<T: Serialize>(draft: &T) -> Result<BTreeSet<String>, Error> {
    Ok(to_document(draft)?
        .into_iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, _)| key)
        .collect())
}

fn to_document<T: Serialize>(fields: &T) -> Result<Document, Error> {
    match serde_json::to_value(fields) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::internal(format!(
            "entity fields serialised to a non-object: {other}"
        ))),
        Err(err) => Err(Error::internal(format!("failed to serialise entity: {err}"))),
    }
}

fn decode<S: EntitySchema>(stored: StoredDocument) -> Result<Entity<S::Fields>, Error> {
    let StoredDocument { id, mut body } = stored;
    body.insert("id".to_owned(), Value::String(id.to_string()));
    from_document(body).map_err(|err| {
        error!(collection = S::COLLECTION, id = %id, error = %err, "stored document is malformed");
        Error::internal(format!("malformed {} {id}: {err}", S::LABEL))
    })
}

fn from_document<T: DeserializeOwned>(body: Document) -> Result<Entity<T>, serde_json::Error> {
    serde_json::from_value(Value::Object(body))
}

fn not_found<S: EntitySchema>(id: &DocumentId) -> Error {
    Error::not_found(format!("{} {id} não encontrado", S::LABEL))
}

fn store_error(collection: &str, err: &DocumentStoreError) -> Error {
    error!(collection, error = %err, "document store failure");
    match err {
        DocumentStoreError::Connection { .. } => {
            Error::service_unavailable("banco de dados indisponível")
        }
        DocumentStoreError::Query { .. } | DocumentStoreError::Decode { .. } => {
            Error::internal(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests;
