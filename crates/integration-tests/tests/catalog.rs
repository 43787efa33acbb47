//! Catalogue browsing and caching.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal_macros::dec;
use shopfront_client::{ClientError, Shopfront, TransitionPolicy};
use shopfront_core::catalog::{ProductFilter, ProductSort};
use shopfront_core::types::ProductId;
use shopfront_integration_tests::{MockBackend, product};

async fn stocked_shop(backend: &MockBackend) -> Shopfront {
    let mut lamp = product("lamp", "Desk Lamp", dec!(60), "Lighting", 5);
    lamp.featured = true;
    backend.add_product(lamp);
    backend.add_product(product("mug", "Mug", dec!(12), "kitchen", 10));
    backend.add_product(product("bulb", "LED Bulb", dec!(8), "lighting", 0));
    backend.add_product(product("kettle", "Kettle", dec!(35), "Kitchen", 3));
    backend.shop(TransitionPolicy::Enforce).await.0
}

fn ids(products: &[shopfront_core::catalog::Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

#[tokio::test]
async fn test_filter_and_sort() {
    let backend = MockBackend::start().await;
    let shop = stocked_shop(&backend).await;

    let lighting = shop
        .catalog()
        .list(&ProductFilter {
            category: Some("lighting".into()),
            sort: ProductSort::PriceLowToHigh,
            ..ProductFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&lighting), ["bulb", "lamp"]);

    let available = shop
        .catalog()
        .list(&ProductFilter {
            in_stock_only: true,
            sort: ProductSort::PriceHighToLow,
            ..ProductFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&available), ["lamp", "kettle", "mug"]);

    let searched = shop
        .catalog()
        .list(&ProductFilter {
            query: Some("MUG".into()),
            ..ProductFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(ids(&searched), ["mug"]);
}

#[tokio::test]
async fn test_catalogue_is_cached() {
    let backend = MockBackend::start().await;
    let shop = stocked_shop(&backend).await;

    shop.catalog().list(&ProductFilter::default()).await.unwrap();
    shop.catalog().categories().await.unwrap();
    shop.catalog().product(&ProductId::new("mug")).await.unwrap();

    assert_eq!(backend.requests_to("products/getAllProducts").len(), 1);
}

#[tokio::test]
async fn test_categories_are_distinct_in_catalogue_order() {
    let backend = MockBackend::start().await;
    let shop = stocked_shop(&backend).await;

    let categories = shop.catalog().categories().await.unwrap();

    assert_eq!(categories, ["Lighting", "kitchen"]);
}

#[tokio::test]
async fn test_featured_products() {
    let backend = MockBackend::start().await;
    let shop = stocked_shop(&backend).await;

    let featured = shop.catalog().featured().await.unwrap();

    assert_eq!(ids(&featured), ["lamp"]);
}

#[tokio::test]
async fn test_unknown_product() {
    let backend = MockBackend::start().await;
    let shop = stocked_shop(&backend).await;

    let err = shop
        .catalog()
        .product(&ProductId::new("nope"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ProductNotFound(ref id) if id.as_str() == "nope"));
}
