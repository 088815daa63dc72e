//! Document upload integration tests.
//!
//! Run with: `cargo test -p docintake-api --test upload_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use chrono::{Datelike, Utc};
use docintake_storage::Storage;
use helpers::auth::{bearer, expired_token_for, token_for};
use helpers::fixtures::{
    upload_form, ADMIN_ID, COMPANY_ID, MISSING_COMPANY_ID, OWNER_ID, STRANGER_ID,
};
use helpers::{api_path, setup_test_app, setup_test_app_with, TestAppOptions};
use serde_json::Value;

#[tokio::test]
async fn test_upload_classifies_stores_and_records() {
    let app = setup_test_app().await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(
            upload_form(COMPANY_ID, "Tilinpäätös_2023.pdf")
                .add_text("fiscalYear", "2023")
                .add_text("locale", "en"),
        )
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["detectedType"], "financial_statements");
    assert_eq!(
        body["message"],
        "Document uploaded successfully. Analysis has been started."
    );

    let file_path = body["filePath"].as_str().unwrap();
    assert!(file_path.starts_with(&format!("documents/{}/", COMPANY_ID)));
    assert!(file_path.ends_with(".pdf"));

    let document = &body["document"];
    assert_eq!(document["name"], "Tilinpäätös_2023.pdf");
    assert_eq!(document["company_id"], COMPANY_ID.to_string());
    assert_eq!(document["uploaded_by"], OWNER_ID.to_string());
    assert_eq!(document["status"], "pending");
    assert_eq!(document["fiscal_year"], 2023);
    assert_eq!(document["fiscal_period"], "annual");
    assert_eq!(document["mime_type"], "application/pdf");
    assert_eq!(document["metadata"]["detected_type"], "financial_statements");
    assert_eq!(document["metadata"]["is_manual_selection"], false);
    assert_eq!(document["metadata"]["locale"], "en");

    assert_eq!(app.storage.upload_count(), 1);
    assert!(app.storage.deleted_keys().is_empty());

    let rows = app.documents.all();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].storage_path, file_path);

    let requests = app.dispatcher.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].document_id, rows[0].id);
    assert_eq!(requests[0].company_id, COMPANY_ID);
    assert!(app.failures.all().is_empty());
}

#[tokio::test]
async fn test_upload_applies_defaults() {
    let app = setup_test_app().await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(upload_form(COMPANY_ID, "liiteaineisto.pdf"))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(
        body["document"]["fiscal_year"],
        i64::from(Utc::now().year() - 1)
    );
    assert_eq!(body["document"]["metadata"]["locale"], "fi");
    assert_eq!(
        body["message"],
        "Asiakirja ladattu onnistuneesti. Analyysi on käynnistetty."
    );
}

#[tokio::test]
async fn test_authoritative_manual_type_wins() {
    let app = setup_test_app().await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(
            upload_form(COMPANY_ID, "Tilinpäätös_2023.pdf")
                .add_text("fiscalYear", "2023")
                .add_text("documentType", "leasing_document"),
        )
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["detectedType"], "leasing_document");
    assert_eq!(body["document"]["metadata"]["is_manual_selection"], true);
    assert_eq!(
        body["document"]["metadata"]["original_manual_selection"],
        "leasing_document"
    );

    let requests = app.dispatcher.requests();
    assert!(requests[0].override_info.is_manual_selection);
}

#[tokio::test]
async fn test_manual_other_overrides_any_filename() {
    let app = setup_test_app().await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(
            upload_form(COMPANY_ID, "verkkokauppa.com_tarjous.pdf").add_text("documentType", "other"),
        )
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["detectedType"], "other");
    assert_eq!(body["document"]["document_type"], "other");
    assert_eq!(body["document"]["metadata"]["is_manual_selection"], true);
}

#[tokio::test]
async fn test_advisory_manual_type_is_recorded_but_not_applied() {
    let app = setup_test_app().await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(
            upload_form(COMPANY_ID, "Tilinpäätös_2023.pdf")
                .add_text("fiscalYear", "2023")
                .add_text("documentType", "forecast"),
        )
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["detectedType"], "financial_statements");
    assert_eq!(body["document"]["metadata"]["is_manual_selection"], false);
    assert_eq!(
        body["document"]["metadata"]["original_manual_selection"],
        "forecast"
    );
}

#[tokio::test]
async fn test_upload_requires_token() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post(&api_path("/documents"))
        .multipart(upload_form(COMPANY_ID, "tarjous.pdf"))
        .await;
    assert_eq!(response.status_code(), 401);

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", "Basic dXNlcjpwYXNz")
        .multipart(upload_form(COMPANY_ID, "tarjous.pdf"))
        .await;
    assert_eq!(response.status_code(), 401);

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&expired_token_for(OWNER_ID)))
        .multipart(upload_form(COMPANY_ID, "tarjous.pdf"))
        .await;
    assert_eq!(response.status_code(), 401);

    assert_eq!(app.storage.upload_count(), 0);
}

#[tokio::test]
async fn test_non_owner_is_forbidden_before_any_write() {
    let app = setup_test_app().await;
    let token = token_for(STRANGER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(upload_form(COMPANY_ID, "tarjous.pdf"))
        .await;

    assert_eq!(response.status_code(), 403);
    assert_eq!(app.storage.upload_count(), 0);
    assert!(app.documents.all().is_empty());
    assert!(app.dispatcher.requests().is_empty());

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(upload_form(MISSING_COMPANY_ID, "tarjous.pdf"))
        .await;
    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn test_admin_may_upload_for_any_company() {
    let app = setup_test_app().await;
    let token = token_for(ADMIN_ID, "admin");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(upload_form(COMPANY_ID, "vakuus.pdf"))
        .await;
    assert_eq!(response.status_code(), 201);

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(upload_form(MISSING_COMPANY_ID, "vakuus.pdf"))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_invalid_forms_are_rejected_with_400() {
    let app = setup_test_app().await;
    let token = token_for(OWNER_ID, "member");

    let cases: Vec<(&str, MultipartForm)> = vec![
        (
            "missing company",
            MultipartForm::new().add_part("file", helpers::fixtures::pdf_part("a.pdf")),
        ),
        (
            "missing file",
            MultipartForm::new().add_text("companyId", COMPANY_ID.to_string()),
        ),
        (
            "malformed company",
            MultipartForm::new()
                .add_text("companyId", "company-1")
                .add_part("file", helpers::fixtures::pdf_part("a.pdf")),
        ),
        (
            "disallowed extension",
            upload_form(COMPANY_ID, "installer.exe"),
        ),
        (
            "malformed year",
            upload_form(COMPANY_ID, "a.pdf").add_text("fiscalYear", "23"),
        ),
        (
            "empty file",
            MultipartForm::new()
                .add_text("companyId", COMPANY_ID.to_string())
                .add_part(
                    "file",
                    Part::bytes(Bytes::new())
                        .file_name("a.pdf")
                        .mime_type("application/pdf"),
                ),
        ),
        (
            "two files",
            upload_form(COMPANY_ID, "a.pdf").add_part("file", helpers::fixtures::pdf_part("b.pdf")),
        ),
    ];

    for (name, form) in cases {
        let response = app
            .client()
            .post(&api_path("/documents"))
            .add_header("Authorization", bearer(&token))
            .multipart(form)
            .await;
        assert_eq!(response.status_code(), 400, "case: {}", name);
        let body: Value = response.json();
        assert!(body["error"].is_string(), "case: {}", name);
    }

    assert_eq!(app.storage.upload_count(), 0);
}

#[tokio::test]
async fn test_oversized_file_is_413() {
    let app = setup_test_app_with(TestAppOptions {
        max_file_size: 16,
        ..Default::default()
    })
    .await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(upload_form(COMPANY_ID, "Tilinpäätös_2023.pdf"))
        .await;

    assert_eq!(response.status_code(), 413);
    assert_eq!(app.storage.upload_count(), 0);
}

#[tokio::test]
async fn test_failed_insert_removes_stored_object() {
    let app = setup_test_app_with(TestAppOptions {
        fail_document_insert: true,
        ..Default::default()
    })
    .await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(upload_form(COMPANY_ID, "Tilinpäätös_2023.pdf"))
        .await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(app.storage.upload_count(), 1);

    let deleted = app.storage.deleted_keys();
    assert_eq!(deleted.len(), 1);
    assert!(deleted[0].starts_with(&format!("documents/{}/", COMPANY_ID)));
    assert!(!app.storage.exists(&deleted[0]).await.unwrap());
    assert!(app.dispatcher.requests().is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_500_without_record() {
    let app = setup_test_app_with(TestAppOptions {
        fail_upload: true,
        ..Default::default()
    })
    .await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(upload_form(COMPANY_ID, "Tilinpäätös_2023.pdf"))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to store document");
    assert_eq!(body["code"], "STORAGE_ERROR");

    assert_eq!(app.storage.upload_count(), 1);
    assert!(app.documents.all().is_empty());
    assert!(app.dispatcher.requests().is_empty());
    assert!(app.storage.deleted_keys().is_empty());
}

#[tokio::test]
async fn test_non_multipart_body_is_json_400() {
    let app = setup_test_app().await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .json(&serde_json::json!({"companyId": COMPANY_ID}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].is_string());
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(app.storage.upload_count(), 0);
}

#[tokio::test]
async fn test_dispatch_failure_does_not_fail_upload() {
    let app = setup_test_app_with(TestAppOptions {
        fail_dispatch: true,
        ..Default::default()
    })
    .await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(upload_form(COMPANY_ID, "verkkokauppa.com_tarjous.pdf"))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["detectedType"], "leasing_document");
    assert_eq!(body["document"]["status"], "pending");

    let failures = app.failures.all();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].backend, "mock");
    assert_eq!(failures[0].company_id, COMPANY_ID);
    assert!(failures[0].error.contains("connection refused"));
    assert_eq!(
        failures[0].payload["override_info"]["detected_type"],
        "leasing_document"
    );
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_upload() {
    let app = setup_test_app_with(TestAppOptions {
        fail_notification: true,
        ..Default::default()
    })
    .await;
    let token = token_for(OWNER_ID, "member");

    let response = app
        .client()
        .post(&api_path("/documents"))
        .add_header("Authorization", bearer(&token))
        .multipart(upload_form(COMPANY_ID, "Tilinpäätös_2023.pdf"))
        .await;

    assert_eq!(response.status_code(), 201);
    assert_eq!(app.documents.all().len(), 1);
}
