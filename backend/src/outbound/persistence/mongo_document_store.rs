//! MongoDB adapter for the document store port.
//!
//! Documents cross the boundary as JSON objects: writes go through
//! `bson::to_document`, reads through relaxed extended JSON with `_id`
//! lifted out into the [`DocumentId`] as an `ObjectId` hex string.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, Bson, Document as BsonDocument, doc, oid::ObjectId};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use tracing::info;

use crate::domain::ports::{DocumentStore, DocumentStoreError, StoredDocument};
use crate::domain::{
    Condition, Document, DocumentId, Filter, FindWindow, SortDirection, SortKey,
};

/// Default server-selection timeout applied to new clients.
pub const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection parameters for [`MongoDocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    /// MongoDB connection string.
    pub uri: String,
    /// Database holding the collections.
    pub database: String,
    /// How long the driver waits for a usable server.
    pub server_selection_timeout: Duration,
}

impl MongoConfig {
    /// Configuration with the default server-selection timeout.
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            server_selection_timeout: DEFAULT_SERVER_SELECTION_TIMEOUT,
        }
    }
}

/// [`DocumentStore`] backed by a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoDocumentStore {
    database: Database,
}

impl MongoDocumentStore {
    /// Build a client for `config`.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first operation (or [`DocumentStore::ping`]) rather than here.
    ///
    /// # Errors
    /// Returns [`DocumentStoreError`] when the URI cannot be parsed.
    pub async fn connect(config: &MongoConfig) -> Result<Self, DocumentStoreError> {
        let mut options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|err| map_error(&err))?;
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.app_name = Some("aeco-backend".to_owned());
        let client = Client::with_options(options).map_err(|err| map_error(&err))?;
        info!(database = %config.database, "mongodb client configured");
        Ok(Self {
            database: client.database(&config.database),
        })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.database.collection(name)
    }
}

fn map_error(err: &MongoError) -> DocumentStoreError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => DocumentStoreError::connection(err.to_string()),
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
            DocumentStoreError::decode(err.to_string())
        }
        _ => DocumentStoreError::query(err.to_string()),
    }
}

/// Parse a store identifier; `None` when it cannot be an `ObjectId`.
fn object_id(id: &DocumentId) -> Option<ObjectId> {
    ObjectId::parse_str(id.as_str()).ok()
}

fn to_bson_document(body: &Document) -> Result<BsonDocument, DocumentStoreError> {
    bson::to_document(body).map_err(|err| DocumentStoreError::decode(err.to_string()))
}

fn to_stored(mut raw: BsonDocument) -> Result<StoredDocument, DocumentStoreError> {
    let oid = raw
        .get_object_id("_id")
        .map_err(|err| DocumentStoreError::decode(err.to_string()))?;
    raw.remove("_id");
    let id = DocumentId::new(oid.to_hex())
        .map_err(|err| DocumentStoreError::decode(err.to_string()))?;
    match Bson::Document(raw).into_relaxed_extjson() {
        Value::Object(body) => Ok(StoredDocument { id, body }),
        other => Err(DocumentStoreError::decode(format!(
            "expected a document, found {other}"
        ))),
    }
}

/// Escape regular-expression metacharacters so user input matches literally.
pub(crate) fn escape_regex(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if "\\.+*?()|[]{}^$#&-~".contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn to_clause(condition: &Condition) -> Result<Bson, DocumentStoreError> {
    Ok(match condition {
        Condition::Equals(value) => {
            bson::to_bson(value).map_err(|err| DocumentStoreError::decode(err.to_string()))?
        }
        Condition::Contains(needle) => Bson::Document(doc! {
            "$regex": escape_regex(needle),
            "$options": "i",
        }),
        Condition::Range { min, max } => {
            let mut bounds = BsonDocument::new();
            if let Some(min) = min {
                bounds.insert("$gte", *min);
            }
            if let Some(max) = max {
                bounds.insert("$lte", *max);
            }
            Bson::Document(bounds)
        }
    })
}

/// Translate the domain filter into a MongoDB query document.
///
/// Alternative groups become `$or` clauses; several groups are combined
/// under `$and` so none overwrites another.
pub(crate) fn to_query(filter: &Filter) -> Result<BsonDocument, DocumentStoreError> {
    let mut query = BsonDocument::new();
    for condition in filter.conditions() {
        query.insert(condition.field.clone(), to_clause(&condition.condition)?);
    }
    let mut groups: Vec<Bson> = Vec::with_capacity(filter.alternatives().len());
    for group in filter.alternatives() {
        let mut branches = Vec::with_capacity(group.len());
        for member in group {
            let mut branch = BsonDocument::new();
            branch.insert(member.field.clone(), to_clause(&member.condition)?);
            branches.push(Bson::Document(branch));
        }
        groups.push(Bson::Array(branches));
    }
    if groups.len() > 1 {
        let all: Vec<Bson> = groups
            .into_iter()
            .map(|branches| Bson::Document(doc! { "$or": branches }))
            .collect();
        query.insert("$and", all);
    } else if let Some(branches) = groups.pop() {
        query.insert("$or", branches);
    }
    Ok(query)
}

/// Sort on the requested key, then on `_id` so equal keys page stably.
fn to_sort(sort: &SortKey) -> BsonDocument {
    let direction = match sort.direction {
        SortDirection::Ascending => 1,
        SortDirection::Descending => -1,
    };
    let mut order = BsonDocument::new();
    order.insert(sort.field.clone(), direction);
    if sort.field != "_id" {
        order.insert("_id", direction);
    }
    order
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn insert(
        &self,
        collection: &str,
        body: Document,
    ) -> Result<DocumentId, DocumentStoreError> {
        let result = self
            .collection(collection)
            .insert_one(to_bson_document(&body)?)
            .await
            .map_err(|err| map_error(&err))?;
        let oid = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DocumentStoreError::decode("inserted id is not an ObjectId"))?;
        DocumentId::new(oid.to_hex()).map_err(|err| DocumentStoreError::decode(err.to_string()))
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        let Some(oid) = object_id(id) else {
            return Ok(None);
        };
        self.collection(collection)
            .find_one(doc! { "_id": oid })
            .await
            .map_err(|err| map_error(&err))?
            .map(to_stored)
            .transpose()
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        window: &FindWindow,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        let coll = self.collection(collection);
        let mut find = coll.find(to_query(filter)?).skip(window.skip);
        if let Some(sort) = &window.sort {
            find = find.sort(to_sort(sort));
        }
        if let Some(limit) = window.limit {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        let raw: Vec<BsonDocument> = find
            .await
            .map_err(|err| map_error(&err))?
            .try_collect()
            .await
            .map_err(|err| map_error(&err))?;
        raw.into_iter().map(to_stored).collect()
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        body: Document,
    ) -> Result<bool, DocumentStoreError> {
        let Some(oid) = object_id(id) else {
            return Ok(false);
        };
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": oid }, doc! { "$set": to_bson_document(&body)? })
            .await
            .map_err(|err| map_error(&err))?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, DocumentStoreError> {
        let Some(oid) = object_id(id) else {
            return Ok(false);
        };
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(|err| map_error(&err))?;
        Ok(result.deleted_count > 0)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, DocumentStoreError> {
        self.collection(collection)
            .count_documents(to_query(filter)?)
            .await
            .map_err(|err| map_error(&err))
    }

    async fn ping(&self) -> Result<(), DocumentStoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|err| map_error(&err))
    }
}
