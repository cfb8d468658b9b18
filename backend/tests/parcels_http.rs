//! End-to-end behaviour of the parcel collection over HTTP.

#[path = "support/app.rs"]
mod app;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use backend::outbound::persistence::InMemoryDocumentStore;
use backend::settings::FrontendMode;
use backend::test_support::MutableClock;
use rstest::rstest;
use serde_json::{Value, json};

const PARCELS: &str = "/formulario-terrenos-projetos";

fn parcel(matricula: &str, estado: &str, area: f64) -> Value {
    json!({
        "matricula": matricula,
        "data": "2024-05-10",
        "municipio": "Campinas",
        "estado": estado,
        "bairro": "Cambuí",
        "logradouro": "Rua Coronel Quirino",
        "numero": "500",
        "cep": "13025-000",
        "lados_poligono": 4,
        "angulos_internos": [90.0, 90.0, 90.0, 90.0],
        "tipo_lote": "esquina",
        "area": area,
        "norte_verdadeiro": 15.5,
        "zona": "zc2",
    })
}

fn clock() -> Arc<MutableClock> {
    Arc::new(MutableClock::new(app::start()))
}

#[rstest]
#[actix_rt::test]
async fn parcel_lifecycle() {
    let clock = clock();
    let app = app::init_app(
        FrontendMode::Jinja,
        Arc::new(InMemoryDocumentStore::new()),
        clock.clone(),
    )
    .await;

    let created: Value = test::call_and_read_body_json(
        &app,
        TestRequest::post()
            .uri(PARCELS)
            .set_json(parcel("MAT-100", "sp", 450.0))
            .to_request(),
    )
    .await;
    let id = created["id"].as_str().expect("id is a string").to_owned();
    assert_eq!(created["estado"], "SP");
    assert_eq!(created["tipo_lote"], "Esquina");
    assert_eq!(created["zona"], "ZC2");
    assert_eq!(created["created_at"], created["updated_at"]);

    clock.advance_seconds(30);
    let item = format!("{PARCELS}/{id}");
    let res = test::call_service(
        &app,
        TestRequest::put()
            .uri(&item)
            .set_json(json!({ "area": 600.0 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(res).await;
    assert_eq!(updated["area"], 600.0);
    for field in ["matricula", "municipio", "estado", "bairro", "tipo_lote", "zona"] {
        assert_eq!(updated[field], created[field], "{field} changed");
    }
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);

    let fetched: Value =
        test::call_and_read_body_json(&app, TestRequest::get().uri(&item).to_request()).await;
    assert_eq!(fetched, updated);

    let res = test::call_service(&app, TestRequest::delete().uri(&item).to_request()).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(&app, TestRequest::get().uri(&item).to_request()).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
    assert!(body["traceId"].is_string());
}

#[rstest]
#[actix_rt::test]
async fn list_pages_newest_first() {
    let clock = clock();
    let app = app::init_app(
        FrontendMode::Jinja,
        Arc::new(InMemoryDocumentStore::new()),
        clock.clone(),
    )
    .await;
    for n in 0..25 {
        let res = test::call_service(
            &app,
            TestRequest::post()
                .uri(PARCELS)
                .set_json(parcel(&format!("MAT-{n:02}"), "SP", 300.0))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        clock.advance_seconds(1);
    }

    let mut seen = Vec::new();
    for (page, expected) in [(1, 10), (2, 10), (3, 5)] {
        let body: Value = test::call_and_read_body_json(
            &app,
            TestRequest::get()
                .uri(&format!("{PARCELS}?page={page}&page_size=10"))
                .to_request(),
        )
        .await;
        assert_eq!(body["total"], 25);
        assert_eq!(body["total_pages"], 3);
        let items = body["items"].as_array().expect("items array");
        assert_eq!(items.len(), expected);
        seen.extend(items.iter().map(|item| item["matricula"].clone()));
    }
    assert_eq!(seen.first(), Some(&json!("MAT-24")));
    assert_eq!(seen.last(), Some(&json!("MAT-00")));
    seen.dedup();
    assert_eq!(seen.len(), 25);

    let clamped: Value = test::call_and_read_body_json(
        &app,
        TestRequest::get()
            .uri(&format!("{PARCELS}?page_size=500"))
            .to_request(),
    )
    .await;
    assert_eq!(clamped["page_size"], 100);
}

#[rstest]
#[actix_rt::test]
async fn filters_and_summary_agree() {
    let app = app::init_app(
        FrontendMode::Jinja,
        Arc::new(InMemoryDocumentStore::new()),
        clock(),
    )
    .await;
    for (matricula, estado, area) in [("A-1", "SP", 200.0), ("A-2", "SP", 800.0), ("B-1", "MG", 400.0)] {
        let res = test::call_service(
            &app,
            TestRequest::post()
                .uri(PARCELS)
                .set_json(parcel(matricula, estado, area))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let filtered: Value = test::call_and_read_body_json(
        &app,
        TestRequest::get()
            .uri(&format!("{PARCELS}?estado=sp&area_min=300"))
            .to_request(),
    )
    .await;
    assert_eq!(filtered["total"], 1);
    assert_eq!(filtered["items"][0]["matricula"], "A-2");

    let searched: Value = test::call_and_read_body_json(
        &app,
        TestRequest::get()
            .uri(&format!("{PARCELS}?search=b-1"))
            .to_request(),
    )
    .await;
    assert_eq!(searched["total"], 1);
    assert_eq!(searched["items"][0]["matricula"], "B-1");

    let by_street: Value = test::call_and_read_body_json(
        &app,
        TestRequest::get()
            .uri(&format!("{PARCELS}?search=quirino&estado=mg"))
            .to_request(),
    )
    .await;
    assert_eq!(by_street["total"], 1);

    let summary: Value = test::call_and_read_body_json(
        &app,
        TestRequest::get()
            .uri(&format!("{PARCELS}/stats/summary"))
            .to_request(),
    )
    .await;
    assert_eq!(summary["total_terrenos"], 3);
}

#[rstest]
#[case(json!({ "matricula": "X" }), StatusCode::UNPROCESSABLE_ENTITY)]
#[case(json!({ "matricula": 12 }), StatusCode::UNPROCESSABLE_ENTITY)]
#[actix_rt::test]
async fn invalid_bodies_are_rejected(#[case] body: Value, #[case] expected: StatusCode) {
    let app = app::init_app(
        FrontendMode::Jinja,
        Arc::new(InMemoryDocumentStore::new()),
        clock(),
    )
    .await;
    let res = test::call_service(
        &app,
        TestRequest::post().uri(PARCELS).set_json(body).to_request(),
    )
    .await;
    assert_eq!(res.status(), expected);
}
