//! Process-local document store.
//!
//! Backs integration tests and `memory://` development runs. Collections are
//! insertion-ordered vectors behind a `std::sync::RwLock`; the lock is never
//! held across an `.await`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{DocumentStore, DocumentStoreError, StoredDocument};
use crate::domain::{Document, DocumentId, Filter, FindWindow};

type Collections = HashMap<String, Vec<StoredDocument>>;

/// In-memory [`DocumentStore`] assigning UUID identifiers.
///
/// # Examples
/// ```
/// use backend::domain::ports::DocumentStore;
/// use backend::outbound::persistence::InMemoryDocumentStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryDocumentStore::new();
/// let id = store.insert("projetos", serde_json::Map::new()).await.expect("insert");
/// assert!(store.find_by_id("projetos", &id).await.expect("find").is_some());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> T {
        let guard = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Collections) -> T) -> T {
        let mut guard = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

fn new_id() -> Result<DocumentId, DocumentStoreError> {
    DocumentId::new(Uuid::new_v4().to_string())
        .map_err(|err| DocumentStoreError::query(err.to_string()))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        body: Document,
    ) -> Result<DocumentId, DocumentStoreError> {
        let id = new_id()?;
        self.write(|collections| {
            collections
                .entry(collection.to_owned())
                .or_default()
                .push(StoredDocument {
                    id: id.clone(),
                    body,
                });
        });
        Ok(id)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        Ok(self.read(|collections| {
            collections
                .get(collection)
                .and_then(|docs| docs.iter().find(|doc| &doc.id == id).cloned())
        }))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        window: &FindWindow,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        let mut matching: Vec<StoredDocument> = self.read(|collections| {
            collections
                .get(collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|doc| filter.matches(&doc.body))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        });
        if let Some(sort) = &window.sort {
            // Ties fall back to insertion order in the key's direction.
            let mut ranked: Vec<_> = matching.into_iter().enumerate().collect();
            ranked.sort_by(|(left_at, left), (right_at, right)| {
                sort.compare(&left.body, &right.body)
                    .then_with(|| sort.direction.apply(left_at.cmp(right_at)))
            });
            matching = ranked.into_iter().map(|(_, doc)| doc).collect();
        }
        let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
        let limit = window
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(matching.into_iter().skip(skip).take(limit).collect())
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        body: Document,
    ) -> Result<bool, DocumentStoreError> {
        Ok(self.write(|collections| {
            let Some(doc) = collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|doc| &doc.id == id))
            else {
                return false;
            };
            doc.body.extend(body);
            true
        }))
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, DocumentStoreError> {
        Ok(self.write(|collections| {
            let Some(docs) = collections.get_mut(collection) else {
                return false;
            };
            let before = docs.len();
            docs.retain(|doc| &doc.id != id);
            docs.len() != before
        }))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, DocumentStoreError> {
        let matched = self.read(|collections| {
            collections.get(collection).map_or(0, |docs| {
                docs.iter().filter(|doc| filter.matches(&doc.body)).count()
            })
        });
        Ok(matched as u64)
    }

    async fn ping(&self) -> Result<(), DocumentStoreError> {
        Ok(())
    }
}
