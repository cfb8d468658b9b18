//! Lifecycle rules of the generic repository.

use super::*;
use crate::domain::ports::MockDocumentStore;
use crate::domain::{ErrorCode, ParcelDraft, ParcelKind, ProjectDraft, ProjectKind};
use crate::outbound::persistence::InMemoryDocumentStore;
use crate::test_support::MutableClock;
use async_trait::async_trait;
use chrono::TimeZone;
use pagination::PageRequest;
use rstest::{fixture, rstest};
use serde_json::json;

struct Harness {
    store: Arc<InMemoryDocumentStore>,
    clock: Arc<MutableClock>,
}

impl Harness {
    fn parcels(&self) -> EntityRepository<ParcelKind> {
        EntityRepository::new(self.store.clone(), self.clock.clone())
    }

    fn projects(&self) -> EntityRepository<ProjectKind> {
        EntityRepository::new(self.store.clone(), self.clock.clone())
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0)
        .single()
        .expect("valid start instant")
}

#[fixture]
fn harness() -> Harness {
    Harness {
        store: Arc::new(InMemoryDocumentStore::new()),
        clock: Arc::new(MutableClock::new(start())),
    }
}

fn parcel_draft(matricula: &str) -> ParcelDraft {
    serde_json::from_value(json!({
        "matricula": matricula,
        "data": "2024-05-10",
        "municipio": "Campinas",
        "estado": "SP",
        "bairro": "Cambuí",
        "logradouro": "Rua Coronel Quirino",
        "numero": "500",
        "cep": "13025-000",
        "lados_poligono": 4,
        "tipo_lote": "Padrão",
        "area": 450.0,
        "norte_verdadeiro": 15.5,
        "zona": "ZC2",
    }))
    .expect("fixture draft deserialises")
}

/// Store that commits another client's write just before each update.
struct InterleavingStore {
    inner: Arc<InMemoryDocumentStore>,
    concurrent: Document,
}

#[async_trait]
impl DocumentStore for InterleavingStore {
    async fn insert(
        &self,
        collection: &str,
        body: Document,
    ) -> Result<DocumentId, DocumentStoreError> {
        self.inner.insert(collection, body).await
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        self.inner.find_by_id(collection, id).await
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        window: &FindWindow,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        self.inner.find_many(collection, filter, window).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        body: Document,
    ) -> Result<bool, DocumentStoreError> {
        self.inner
            .update(collection, id, self.concurrent.clone())
            .await?;
        self.inner.update(collection, id, body).await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<bool, DocumentStoreError> {
        self.inner.delete(collection, id).await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, DocumentStoreError> {
        self.inner.count(collection, filter).await
    }

    async fn ping(&self) -> Result<(), DocumentStoreError> {
        self.inner.ping().await
    }
}

fn unknown_id() -> DocumentId {
    DocumentId::new("00000000-0000-0000-0000-000000000000").expect("valid id")
}

#[rstest]
#[tokio::test]
async fn create_then_get_round_trips(harness: Harness) {
    let repo = harness.parcels();
    let created = repo.create(parcel_draft("MAT-1")).await.expect("create");
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(created.created_at, start());

    let fetched = repo.get_by_id(&created.id).await.expect("get");
    assert_eq!(fetched, created);
}

#[rstest]
#[tokio::test]
async fn create_truncates_clock_to_microseconds(harness: Harness) {
    let precise = Utc
        .timestamp_opt(1_715_333_400, 987_654_321)
        .single()
        .expect("valid instant");
    harness.clock.set(precise);
    let created = harness
        .projects()
        .create(ProjectDraft {
            nome: Some("Galpão".to_owned()),
            ..ProjectDraft::default()
        })
        .await
        .expect("create");
    assert_eq!(created.created_at.timestamp_subsec_nanos(), 987_654_000);
}

#[rstest]
#[tokio::test]
async fn empty_update_only_bumps_updated_at(harness: Harness) {
    let repo = harness.parcels();
    let created = repo.create(parcel_draft("MAT-2")).await.expect("create");
    harness.clock.advance_seconds(60);

    let updated = repo
        .update(&created.id, ParcelDraft::default())
        .await
        .expect("update");
    assert_eq!(updated.fields, created.fields);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert_eq!(repo.get_by_id(&created.id).await.expect("get"), updated);
}

#[rstest]
#[tokio::test]
async fn updated_at_never_moves_backwards(harness: Harness) {
    let repo = harness.parcels();
    let created = repo.create(parcel_draft("MAT-3")).await.expect("create");
    harness.clock.advance_seconds(-3600);

    let updated = repo
        .update(&created.id, ParcelDraft::default())
        .await
        .expect("update");
    assert_eq!(updated.updated_at, created.updated_at);
}

#[rstest]
#[tokio::test]
async fn update_merges_and_revalidates(harness: Harness) {
    let repo = harness.parcels();
    let created = repo.create(parcel_draft("MAT-4")).await.expect("create");

    let patch = ParcelDraft {
        area: Some(500.0),
        zona: Some("zh1".to_owned()),
        ..ParcelDraft::default()
    };
    let updated = repo.update(&created.id, patch).await.expect("update");
    assert_eq!(updated.fields.area, 500.0);
    assert_eq!(updated.fields.zona, "ZH1");
    assert_eq!(updated.fields.matricula, "MAT-4");

    let invalid = ParcelDraft {
        area: Some(-1.0),
        ..ParcelDraft::default()
    };
    let err = repo.update(&created.id, invalid).await.expect_err("invalid area");
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    let stored = repo.get_by_id(&created.id).await.expect("get");
    assert_eq!(stored.fields.area, 500.0);
}

#[rstest]
#[tokio::test]
async fn update_keeps_fields_written_concurrently(harness: Harness) {
    let store = InterleavingStore {
        inner: harness.store.clone(),
        concurrent: json!({ "observacoes": "B" })
            .as_object()
            .cloned()
            .unwrap_or_default(),
    };
    let repo: EntityRepository<ParcelKind> =
        EntityRepository::new(Arc::new(store), harness.clock.clone());
    let created = repo.create(parcel_draft("MAT-6")).await.expect("create");

    let patch = ParcelDraft {
        area: Some(600.0),
        ..ParcelDraft::default()
    };
    let updated = repo.update(&created.id, patch).await.expect("update");

    assert_eq!(updated.fields.area, 600.0);
    assert_eq!(updated.fields.observacoes.as_deref(), Some("B"));
    let stored = harness
        .parcels()
        .get_by_id(&created.id)
        .await
        .expect("get");
    assert_eq!(stored, updated);
}

#[rstest]
#[tokio::test]
async fn update_writes_only_provided_fields() {
    let mut store = MockDocumentStore::new();
    let id = unknown_id();
    let fields = ParcelKind::validate(parcel_draft("MAT-7")).expect("valid draft");
    let mut existing = serde_json::to_value(fields)
        .expect("serialise fields")
        .as_object()
        .cloned()
        .expect("fields are an object");
    existing.insert("created_at".to_owned(), json!("2024-05-10T09:30:00.000000Z"));
    existing.insert("updated_at".to_owned(), json!("2024-05-10T09:30:00.000000Z"));
    store.expect_find_by_id().returning(move |_, id| {
        Ok(Some(StoredDocument {
            id: id.clone(),
            body: existing.clone(),
        }))
    });
    store
        .expect_update()
        .withf(|_, _, body| {
            let mut keys: Vec<&str> = body.keys().map(String::as_str).collect();
            keys.sort_unstable();
            keys == ["updated_at", "zona"] && body["zona"] == "ZH1"
        })
        .times(1)
        .returning(|_, _, _| Ok(true));
    let repo: EntityRepository<ParcelKind> =
        EntityRepository::new(Arc::new(store), Arc::new(MutableClock::new(start())));

    let patch = ParcelDraft {
        zona: Some("zh1".to_owned()),
        ..ParcelDraft::default()
    };
    repo.update(&id, patch).await.expect("update");
}

#[rstest]
#[tokio::test]
async fn unknown_ids_are_not_found(harness: Harness) {
    let repo = harness.parcels();
    let id = unknown_id();
    let get = repo.get_by_id(&id).await.expect_err("get");
    let update = repo
        .update(&id, ParcelDraft::default())
        .await
        .expect_err("update");
    let delete = repo.delete(&id).await.expect_err("delete");
    for err in [get, update, delete] {
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}

#[rstest]
#[tokio::test]
async fn invalid_create_stores_nothing(harness: Harness) {
    let repo = harness.parcels();
    let mut draft = parcel_draft("MAT-5");
    draft.area = None;

    let err = repo.create(draft).await.expect_err("area is required");
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    let details = err.details().expect("field details");
    assert_eq!(details["fields"][0]["field"], "area");
    assert_eq!(repo.count(&Filter::new()).await.expect("count"), 0);
}

#[rstest]
#[tokio::test]
async fn pages_are_disjoint_and_newest_first(harness: Harness) {
    let repo = harness.parcels();
    for n in 0..25 {
        repo.create(parcel_draft(&format!("MAT-{n:02}")))
            .await
            .expect("create");
        harness.clock.advance_seconds(1);
    }

    let filter = Filter::new();
    let first = repo
        .list(&filter, PageRequest::new(1, 10).expect("page"))
        .await
        .expect("page 1");
    let second = repo
        .list(&filter, PageRequest::new(2, 10).expect("page"))
        .await
        .expect("page 2");

    assert_eq!(second.len(), 10);
    assert!(second.iter().all(|b| first.iter().all(|a| a.id != b.id)));
    assert_eq!(first[0].fields.matricula, "MAT-24");
    assert_eq!(second[0].fields.matricula, "MAT-14");
    assert_eq!(repo.count(&filter).await.expect("count"), 25);
}

#[rstest]
#[tokio::test]
async fn delete_removes_record(harness: Harness) {
    let repo = harness.projects();
    let created = repo
        .create(ProjectDraft {
            nome: Some("Escola".to_owned()),
            ..ProjectDraft::default()
        })
        .await
        .expect("create");
    repo.delete(&created.id).await.expect("delete");
    let err = repo.get_by_id(&created.id).await.expect_err("gone");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn connection_failures_become_service_unavailable() {
    let mut store = MockDocumentStore::new();
    store
        .expect_count()
        .returning(|_, _| Err(DocumentStoreError::connection("server selection timeout")));
    let repo: EntityRepository<ProjectKind> =
        EntityRepository::new(Arc::new(store), Arc::new(MutableClock::new(start())));

    let err = repo.count(&Filter::new()).await.expect_err("store down");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn malformed_documents_are_internal_errors() {
    let mut store = MockDocumentStore::new();
    store.expect_find_by_id().returning(|_, id| {
        Ok(Some(StoredDocument {
            id: id.clone(),
            body: json!({ "nome": 42 })
                .as_object()
                .cloned()
                .unwrap_or_default(),
        }))
    });
    let repo: EntityRepository<ProjectKind> =
        EntityRepository::new(Arc::new(store), Arc::new(MutableClock::new(start())));

    let err = repo.get_by_id(&unknown_id()).await.expect_err("bad document");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
