//! Document read and catalog integration tests.
//!
//! Run with: `cargo test -p docintake-api --test documents_test`

mod helpers;

use helpers::auth::{bearer, token_for};
use helpers::fixtures::{upload_form, COMPANY_ID, OWNER_ID, STRANGER_ID};
use helpers::{api_path, setup_test_app, TestApp};
use serde_json::Value;
use uuid::Uuid;

async fn upload(app: &TestApp, filename: &str) -> Value {
    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token_for(OWNER_ID, "member")))
        .multipart(upload_form(COMPANY_ID, filename))
        .await;
    assert_eq!(response.status_code(), 201);
    response.json()
}

#[tokio::test]
async fn test_get_document() {
    let app = setup_test_app().await;
    let uploaded = upload(&app, "Liiketoimintasuunnitelma.pdf").await;
    let id = uploaded["document"]["id"].as_str().unwrap();

    let response = app
        .client()
        .get(&api_path(&format!("/documents/{}", id)))
        .add_header("Authorization", bearer(&token_for(OWNER_ID, "member")))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["id"], id);
    assert_eq!(body["document_type"], "business_plan");

    let response = app
        .client()
        .get(&api_path(&format!("/documents/{}", id)))
        .add_header("Authorization", bearer(&token_for(STRANGER_ID, "member")))
        .await;
    assert_eq!(response.status_code(), 403);

    let response = app
        .client()
        .get(&api_path(&format!("/documents/{}", Uuid::new_v4())))
        .add_header("Authorization", bearer(&token_for(OWNER_ID, "member")))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_malformed_ids_are_json_400() {
    let app = setup_test_app().await;
    let token = token_for(OWNER_ID, "member");

    for path in ["/documents/not-a-uuid", "/companies/company-1/documents"] {
        let response = app
            .client()
            .get(&api_path(path))
            .add_header("Authorization", bearer(&token))
            .await;
        assert_eq!(response.status_code(), 400, "path: {}", path);
        let body: Value = response.json();
        assert!(body["error"].is_string(), "path: {}", path);
        assert_eq!(body["code"], "INVALID_INPUT", "path: {}", path);
    }
}

#[tokio::test]
async fn test_list_company_documents_newest_first() {
    let app = setup_test_app().await;
    upload(&app, "ennuste_2026.pdf").await;
    upload(&app, "vakuusluettelo.pdf").await;

    let response = app
        .client()
        .get(&api_path(&format!("/companies/{}/documents", COMPANY_ID)))
        .add_header("Authorization", bearer(&token_for(OWNER_ID, "member")))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["name"], "vakuusluettelo.pdf");

    let response = app
        .client()
        .get(&api_path(&format!(
            "/companies/{}/documents?limit=1&offset=1",
            COMPANY_ID
        )))
        .add_header("Authorization", bearer(&token_for(OWNER_ID, "member")))
        .await;
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["name"], "ennuste_2026.pdf");
}

#[tokio::test]
async fn test_list_rejects_bad_pagination_and_strangers() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&api_path(&format!(
            "/companies/{}/documents?limit=0",
            COMPANY_ID
        )))
        .add_header("Authorization", bearer(&token_for(OWNER_ID, "member")))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .client()
        .get(&api_path(&format!("/companies/{}/documents", COMPANY_ID)))
        .add_header("Authorization", bearer(&token_for(STRANGER_ID, "member")))
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_document_types_are_localized() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&api_path("/document-types?locale=sv"))
        .add_header("Authorization", bearer(&token_for(STRANGER_ID, "viewer")))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Vec<Value> = response.json();
    assert_eq!(body.len(), 9);
    assert_eq!(body[0]["code"], "financial_statements");
    assert_eq!(body[0]["name"], "sv:financial_statements");

    let response = app
        .client()
        .get(&api_path("/document-types"))
        .add_header("Authorization", bearer(&token_for(STRANGER_ID, "viewer")))
        .await;
    let body: Vec<Value> = response.json();
    assert_eq!(body[0]["name"], "fi:financial_statements");
}

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let app = setup_test_app().await;

    let response = app.client().get("/live").await;
    assert_eq!(response.status_code(), 200);

    let response = app.client().get("/ready").await;
    assert_eq!(response.status_code(), 200);

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
    assert_eq!(body["storage_backend"], "local");

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
}
