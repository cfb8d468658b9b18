//! Behaviour while the document store is unreachable.

#[path = "support/app.rs"]
mod app;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use async_trait::async_trait;
use backend::domain::ports::{DocumentStore, DocumentStoreError, StoredDocument};
use backend::domain::{Document, DocumentId, Filter, FindWindow};
use backend::settings::FrontendMode;
use backend::test_support::MutableClock;
use rstest::rstest;
use serde_json::{Value, json};

/// Store whose every call fails as if the server were down.
struct UnreachableStore;

fn down() -> DocumentStoreError {
    DocumentStoreError::connection("server selection timeout")
}

#[async_trait]
impl DocumentStore for UnreachableStore {
    async fn insert(&self, _: &str, _: Document) -> Result<DocumentId, DocumentStoreError> {
        Err(down())
    }

    async fn find_by_id(
        &self,
        _: &str,
        _: &DocumentId,
    ) -> Result<Option<StoredDocument>, DocumentStoreError> {
        Err(down())
    }

    async fn find_many(
        &self,
        _: &str,
        _: &Filter,
        _: &FindWindow,
    ) -> Result<Vec<StoredDocument>, DocumentStoreError> {
        Err(down())
    }

    async fn update(
        &self,
        _: &str,
        _: &DocumentId,
        _: Document,
    ) -> Result<bool, DocumentStoreError> {
        Err(down())
    }

    async fn delete(&self, _: &str, _: &DocumentId) -> Result<bool, DocumentStoreError> {
        Err(down())
    }

    async fn count(&self, _: &str, _: &Filter) -> Result<u64, DocumentStoreError> {
        Err(down())
    }

    async fn ping(&self) -> Result<(), DocumentStoreError> {
        Err(down())
    }
}

#[rstest]
#[actix_rt::test]
async fn degraded_store_is_reported() {
    let app = app::init_app(
        FrontendMode::Jinja,
        Arc::new(UnreachableStore),
        Arc::new(MutableClock::new(app::start())),
    )
    .await;

    let res = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let report: Value = test::read_body_json(res).await;
    assert_eq!(report["status"], "degraded");
    assert_eq!(report["mongo"], false);

    let res = test::call_service(&app, TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let res = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(&app, TestRequest::get().uri("/health-status").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let fragment = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf-8");
    assert!(fragment.contains("MongoDB: FAIL"));

    let res = test::call_service(&app, TestRequest::get().uri("/terrenos-list").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let fragment = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf-8");
    assert!(fragment.contains("Erro ao carregar lista de terrenos."));
}

#[rstest]
#[actix_rt::test]
async fn writes_fail_with_service_unavailable() {
    let app = app::init_app(
        FrontendMode::Jinja,
        Arc::new(UnreachableStore),
        Arc::new(MutableClock::new(app::start())),
    )
    .await;
    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/projetos")
            .set_json(json!({ "nome": "Praça" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "service_unavailable");
}
