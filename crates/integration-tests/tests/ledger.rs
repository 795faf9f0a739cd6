//! Integration tests for the movement ledger and derived balances.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::StatusCode;

use stockroom_core::EntityName;
use stockroom_integration_tests::{TestApp, body_string, session_cookie, spawn_app};
use stockroom_server::db::locations::LocationRepository;
use stockroom_server::db::movements::MovementRepository;
use stockroom_server::db::products::ProductRepository;
use stockroom_server::models::{Location, Product};

async fn fixture(app: &TestApp) -> (Product, Location, Location) {
    let product = ProductRepository::new(&app.pool)
        .create(&EntityName::parse("Widget").unwrap())
        .await
        .unwrap();
    let locations = LocationRepository::new(&app.pool);
    let a = locations
        .create(&EntityName::parse("WarehouseA").unwrap())
        .await
        .unwrap();
    let b = locations
        .create(&EntityName::parse("WarehouseB").unwrap())
        .await
        .unwrap();
    (product, a, b)
}

#[tokio::test]
async fn test_record_purchase_and_transfer_yields_expected_balances() {
    let app = spawn_app().await;
    let (product, a, b) = fixture(&app).await;

    // Purchase 10 into A
    let response = app
        .post_form(
            "/movements/add",
            &format!("product_id={}&from_location_id=&to_location_id={}&qty=10", product.id, a.id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Transfer 4 from A to B
    let response = app
        .post_form(
            "/movements/add",
            &format!(
                "product_id={}&from_location_id={}&to_location_id={}&qty=4",
                product.id, a.id, b.id
            ),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let balances = MovementRepository::new(&app.pool).balances().await.unwrap();
    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].location_name, "WarehouseA");
    assert_eq!(balances[0].qty, 6);
    assert_eq!(balances[1].location_name, "WarehouseB");
    assert_eq!(balances[1].qty, 4);
}

#[tokio::test]
async fn test_dashboard_shows_balances_and_recent_movements() {
    let app = spawn_app().await;
    let (product, a, _) = fixture(&app).await;

    app.post_form(
        "/movements/add",
        &format!("product_id={}&from_location_id=&to_location_id={}&qty=7", product.id, a.id),
    )
    .await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Widget"));
    assert!(body.contains("WarehouseA"));
    assert!(body.contains("7"));
}

#[tokio::test]
async fn test_non_numeric_quantity_rejected() {
    let app = spawn_app().await;
    let (product, a, _) = fixture(&app).await;

    let response = app
        .post_form(
            "/movements/add",
            &format!("product_id={}&from_location_id=&to_location_id={}&qty=lots", product.id, a.id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let cookie = session_cookie(&response).unwrap();
    let response = app.get_with_cookie("/movements", &cookie).await;
    assert!(body_string(response).await.contains("Quantity must be a valid number."));

    let movements = MovementRepository::new(&app.pool).list_recent(10).await.unwrap();
    assert!(movements.is_empty());
}

#[tokio::test]
async fn test_zero_quantity_rejected() {
    let app = spawn_app().await;
    let (product, a, _) = fixture(&app).await;

    let response = app
        .post_form(
            "/movements/add",
            &format!("product_id={}&from_location_id=&to_location_id={}&qty=0", product.id, a.id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let cookie = session_cookie(&response).unwrap();
    let response = app.get_with_cookie("/movements", &cookie).await;
    assert!(body_string(response).await.contains("Quantity must be greater than zero."));
}

#[tokio::test]
async fn test_movement_without_endpoints_rejected() {
    let app = spawn_app().await;
    let (product, _, _) = fixture(&app).await;

    let response = app
        .post_form(
            "/movements/add",
            &format!("product_id={}&from_location_id=&to_location_id=&qty=5", product.id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let movements = MovementRepository::new(&app.pool).list_recent(10).await.unwrap();
    assert!(movements.is_empty());
}

#[tokio::test]
async fn test_movement_with_same_endpoints_rejected() {
    let app = spawn_app().await;
    let (product, a, _) = fixture(&app).await;

    let response = app
        .post_form(
            "/movements/add",
            &format!(
                "product_id={}&from_location_id={}&to_location_id={}&qty=5",
                product.id, a.id, a.id
            ),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let cookie = session_cookie(&response).unwrap();
    let response = app.get_with_cookie("/movements", &cookie).await;
    assert!(
        body_string(response)
            .await
            .contains("Source and Destination locations cannot be the same.")
    );
}

#[tokio::test]
async fn test_product_with_history_cannot_be_deleted() {
    let app = spawn_app().await;
    let (product, a, _) = fixture(&app).await;

    app.post_form(
        "/movements/add",
        &format!("product_id={}&from_location_id=&to_location_id={}&qty=3", product.id, a.id),
    )
    .await;

    let response = app
        .post_form(&format!("/products/{}/delete", product.id), "")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let cookie = session_cookie(&response).unwrap();
    let response = app.get_with_cookie("/products", &cookie).await;
    assert!(body_string(response).await.contains("movement history"));

    let products = ProductRepository::new(&app.pool).list_all().await.unwrap();
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn test_location_with_history_cannot_be_deleted() {
    let app = spawn_app().await;
    let (product, a, _) = fixture(&app).await;

    app.post_form(
        "/movements/add",
        &format!("product_id={}&from_location_id=&to_location_id={}&qty=3", product.id, a.id),
    )
    .await;

    let response = app
        .post_form(&format!("/locations/{}/delete", a.id), "")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let locations = LocationRepository::new(&app.pool).list_all().await.unwrap();
    assert_eq!(locations.len(), 2);
}
