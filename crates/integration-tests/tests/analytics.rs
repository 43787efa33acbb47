//! Admin dashboard figures.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal_macros::dec;
use serde_json::json;
use shopfront_client::{ClientError, Credentials, Shopfront, TransitionPolicy};
use shopfront_core::types::{OrderStatus, Price, Role};
use shopfront_integration_tests::{MockBackend, StatusCode};

async fn admin_shop(backend: &MockBackend) -> Shopfront {
    backend.add_account("root", "admin-pw", Role::Admin);
    let (shop, _) = backend.shop(TransitionPolicy::Enforce).await;
    shop.auth()
        .admin_login(&Credentials::new("root", "admin-pw"), false)
        .await
        .unwrap();
    shop
}

#[tokio::test]
async fn test_dashboard_decodes_all_sections() {
    let backend = MockBackend::start().await;
    let shop = admin_shop(&backend).await;

    let dashboard = shop.admin().dashboard().await.unwrap();

    assert_eq!(dashboard.sales.total_sales, Price::new(dec!(1234.5)));
    assert_eq!(dashboard.sales.sales_by_category.len(), 2);
    assert_eq!(dashboard.orders.count_for(OrderStatus::Pending), 3);
    assert_eq!(dashboard.orders.count_for(OrderStatus::Shipped), 0);
    assert_eq!(dashboard.orders.total_orders(), 8);
    assert_eq!(dashboard.orders.avg_order_value.display(), "$154.31");
    assert!(dashboard.products.low_stock[0].is_critical());
    assert_eq!(dashboard.products.top_rated[0].avg_rating, dec!(4.5));
    assert_eq!(dashboard.customers.new_customers, 7);
}

#[tokio::test]
async fn test_dashboard_tolerates_sparse_sections() {
    let backend = MockBackend::start().await;
    backend.set_analytics("customers", json!({}));
    backend.set_analytics("sales", json!({ "totalSales": 10 }));
    let shop = admin_shop(&backend).await;

    let dashboard = shop.admin().dashboard().await.unwrap();

    assert_eq!(dashboard.sales.total_sales, Price::new(dec!(10)));
    assert!(dashboard.sales.sales_by_date.is_empty());
    assert_eq!(dashboard.customers.new_customers, 0);
    assert!(dashboard.customers.top_customers.is_empty());
}

#[tokio::test]
async fn test_dashboard_uses_admin_token() {
    let backend = MockBackend::start().await;
    let shop = admin_shop(&backend).await;
    let admin = shop.auth().current_admin().await.unwrap();

    shop.admin().dashboard().await.unwrap();

    let requests = backend.requests_to("analytics/");
    assert_eq!(requests.len(), 4);
    assert!(
        requests
            .iter()
            .all(|r| r.bearer.as_deref() == Some(admin.token.expose()))
    );
}

#[tokio::test]
async fn test_dashboard_failure_is_reported() {
    let backend = MockBackend::start().await;
    let shop = admin_shop(&backend).await;
    backend.fail_next(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching analytics");

    let err = shop.admin().dashboard().await.unwrap_err();

    assert!(matches!(err, ClientError::Api(_)));
    assert_eq!(err.to_string(), "Error fetching analytics");
}
