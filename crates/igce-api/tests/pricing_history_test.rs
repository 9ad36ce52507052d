mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{set_cookie_text, setup_test_app, TestApp};
use igce_core::models::UploadKind;

const CSV: &[u8] = b"vendor,item,price\nvendor2,truck,45000\n";

fn pricing_form(vendor: &str, date: &str, database: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name_of_vendor", vendor)
        .add_text("performance_date", date)
        .add_text("rep_rfq", "RFQ-77")
        .add_text("project_name", "Fleet renewal")
        .add_text("database", database)
}

fn with_file(form: MultipartForm) -> MultipartForm {
    form.add_part(
        "location",
        Part::bytes(CSV.to_vec())
            .file_name("history.csv")
            .mime_type("text/csv"),
    )
}

fn field_block<'a>(html: &'a str, name: &str) -> &'a str {
    let start = html
        .find(&format!("<label for=\"{}\">", name))
        .unwrap_or_else(|| panic!("field {} not rendered", name));
    let end = html[start..].find("</div>").map(|i| start + i).unwrap_or(html.len());
    &html[start..end]
}

async fn post(app: &TestApp, form: MultipartForm) -> axum_test::TestResponse {
    app.server
        .post("/pn")
        .add_header("Authorization", app.bearer())
        .multipart(form)
        .await
}

#[tokio::test]
async fn test_form_defaults_performance_date_to_today() {
    let app = setup_test_app();
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();

    let response = app
        .server
        .get("/pn")
        .add_header("Authorization", app.bearer())
        .await;

    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(html.contains("<title>CSV to Database configuration</title>"));
    assert!(field_block(&html, "performance_date").contains(&format!("value=\"{}\"", today)));

    let vendors = field_block(&html, "name_of_vendor");
    for vendor in ["vendor1", "vendor2", "vendor3"] {
        assert!(vendors.contains(&format!("<option value=\"{}\">", vendor)));
    }
}

#[tokio::test]
async fn test_pricing_history_lists_databases_without_schema_access() {
    let app = setup_test_app();

    let html = app
        .server
        .get("/pn")
        .add_header("Authorization", app.bearer())
        .await
        .text();

    let databases = field_block(&html, "database");
    assert!(databases.contains(">examples</option>"));
    assert!(databases.contains(">warehouse</option>"));
    assert!(!databases.contains(">archive</option>"));
}

#[tokio::test]
async fn test_unknown_vendor_rejected() {
    let app = setup_test_app();

    let response = post(&app, with_file(pricing_form("vendor9", "2024-03-01", "1"))).await;

    assert_eq!(response.status_code(), 422);
    assert!(field_block(&response.text(), "name_of_vendor").contains("Not a valid choice."));
    assert!(app.temp_files().is_empty());
    assert!(app.store.records().is_empty());
}

#[tokio::test]
async fn test_missing_and_invalid_dates() {
    let app = setup_test_app();

    let response = post(&app, with_file(pricing_form("vendor1", "", "1"))).await;
    assert_eq!(response.status_code(), 422);
    assert!(field_block(&response.text(), "performance_date")
        .contains("please select performance date"));

    let response = post(&app, with_file(pricing_form("vendor1", "03/01/2024", "1"))).await;
    assert_eq!(response.status_code(), 422);
    assert!(field_block(&response.text(), "performance_date").contains("Not a valid date value."));
}

#[tokio::test]
async fn test_missing_file_rejected() {
    let app = setup_test_app();

    let response = post(&app, pricing_form("vendor1", "2024-03-01", "1")).await;

    assert_eq!(response.status_code(), 422);
    assert!(field_block(&response.text(), "location").contains("This field is required."));
}

#[tokio::test]
async fn test_valid_upload_redirects_back_to_form() {
    let app = setup_test_app();

    let response = post(&app, with_file(pricing_form("vendor2", "2024-03-01", "1"))).await;

    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/pn");
    assert!(set_cookie_text(&response).starts_with("flash=success:"));

    let records = app.store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, UploadKind::PricingHistory);
    assert_eq!(records[0].metadata["name_of_vendor"], "vendor2");
    assert_eq!(records[0].metadata["performance_date"], "2024-03-01");

    let stored = app.stored_files(UploadKind::PricingHistory);
    assert_eq!(stored.len(), 1);
    assert_eq!(std::fs::read(&stored[0]).unwrap(), CSV);
}

#[tokio::test]
async fn test_requires_authentication() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/pn")
        .multipart(with_file(pricing_form("vendor2", "2024-03-01", "1")))
        .await;

    assert_eq!(response.status_code(), 401);
    assert!(app.store.records().is_empty());
}
