//! Integration tests for the PDF balance report download.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::{StatusCode, header};

use stockroom_core::EntityName;
use stockroom_integration_tests::{body_bytes, spawn_app};
use stockroom_server::db::locations::LocationRepository;
use stockroom_server::db::products::ProductRepository;

#[tokio::test]
async fn test_empty_report_redirects_to_dashboard() {
    let app = spawn_app().await;

    let response = app.get("/report/download").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

#[tokio::test]
async fn test_report_downloads_as_pdf_attachment() {
    let app = spawn_app().await;

    let product = ProductRepository::new(&app.pool)
        .create(&EntityName::parse("Widget").unwrap())
        .await
        .unwrap();
    let location = LocationRepository::new(&app.pool)
        .create(&EntityName::parse("WarehouseA").unwrap())
        .await
        .unwrap();
    app.post_form(
        "/movements/add",
        &format!(
            "product_id={}&from_location_id=&to_location_id={}&qty=5",
            product.id, location.id
        ),
    )
    .await;

    let response = app.get("/report/download").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("inventory_report.pdf"));

    let body = body_bytes(response).await;
    assert!(body.starts_with(b"%PDF"));
}
