//! End-to-end behaviour of the project collection over HTTP.

#[path = "support/app.rs"]
mod app;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use backend::outbound::persistence::InMemoryDocumentStore;
use backend::settings::FrontendMode;
use backend::test_support::MutableClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::new(app::start()))
}

#[rstest]
#[actix_rt::test]
async fn project_lifecycle(clock: Arc<MutableClock>) {
    let app = app::init_app(
        FrontendMode::Static,
        Arc::new(InMemoryDocumentStore::new()),
        clock.clone(),
    )
    .await;

    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/projetos")
            .set_json(json!({
                "nome": "Escola Municipal",
                "responsavel": "Ana",
                "tipologia": "Institucional",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["tipologia"], "institucional");
    let item = format!("/projetos/{}", created["id"].as_str().expect("id"));

    clock.advance_seconds(5);
    let patched: Value = test::call_and_read_body_json(
        &app,
        TestRequest::patch()
            .uri(&item)
            .set_json(json!({ "descricao": "Reforma do bloco B" }))
            .to_request(),
    )
    .await;
    assert_eq!(patched["nome"], "Escola Municipal");
    assert_eq!(patched["descricao"], "Reforma do bloco B");
    assert_eq!(patched["created_at"], created["created_at"]);

    let listed: Value = test::call_and_read_body_json(
        &app,
        TestRequest::get()
            .uri("/projetos?responsavel=Ana&nome=escola")
            .to_request(),
    )
    .await;
    assert_eq!(listed["total"], 1);

    for (term, total) in [("bloco", 1), ("ginasio", 0)] {
        let searched: Value = test::call_and_read_body_json(
            &app,
            TestRequest::get()
                .uri(&format!("/projetos?search={term}"))
                .to_request(),
        )
        .await;
        assert_eq!(searched["total"], total, "search={term}");
    }

    let res = test::call_service(&app, TestRequest::delete().uri(&item).to_request()).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = test::call_service(&app, TestRequest::delete().uri(&item).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/projetos/not-an-id")]
#[case("/projetos/00000000-0000-0000-0000-000000000000")]
#[actix_rt::test]
async fn unknown_projects_are_not_found(clock: Arc<MutableClock>, #[case] uri: &str) {
    let app = app::init_app(
        FrontendMode::Jinja,
        Arc::new(InMemoryDocumentStore::new()),
        clock,
    )
    .await;
    let res = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_rt::test]
async fn unknown_typology_is_unprocessable(clock: Arc<MutableClock>) {
    let app = app::init_app(
        FrontendMode::Jinja,
        Arc::new(InMemoryDocumentStore::new()),
        clock,
    )
    .await;
    let res = test::call_service(
        &app,
        TestRequest::post()
            .uri("/projetos")
            .set_json(json!({ "nome": "Galpão", "tipologia": "industrial" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "validation_failed");
}
