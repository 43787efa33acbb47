//! Favourites for signed-in customers and guests.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal_macros::dec;
use shopfront_client::services::Variant;
use shopfront_client::{ClientError, Credentials, TransitionPolicy};
use shopfront_core::types::{ProductId, Role};
use shopfront_integration_tests::{MockBackend, StatusCode, product, temp_dir};

fn scarf() -> ProductId {
    ProductId::new("scarf")
}

fn seed(backend: &MockBackend) {
    backend.add_product(product("scarf", "Wool Scarf", dec!(19), "accessories", 8));
    backend.add_product(product("mug", "Mug", dec!(12), "kitchen", 10));
}

#[tokio::test]
async fn test_signed_in_toggle_goes_through_backend() {
    let backend = MockBackend::start().await;
    seed(&backend);
    backend.add_account("ada", "pw", Role::User);
    let (shop, _) = backend.shop(TransitionPolicy::Enforce).await;
    shop.auth().login(&Credentials::new("ada", "pw")).await.unwrap();

    assert!(shop.favourites().toggle_product(&scarf(), None).await.unwrap());
    assert_eq!(backend.favourites_of("ada").len(), 1);
    assert!(shop.favourites().contains(&scarf()).await);

    assert!(!shop.favourites().toggle_product(&scarf(), None).await.unwrap());
    assert!(backend.favourites_of("ada").is_empty());
    assert!(!shop.favourites().contains(&scarf()).await);

    assert_eq!(backend.requests_to("favourites/add").len(), 1);
    assert_eq!(backend.requests_to("favourites/remove/scarf").len(), 1);
}

#[tokio::test]
async fn test_fetch_replaces_local_set() {
    let backend = MockBackend::start().await;
    seed(&backend);
    backend.add_account("ada", "pw", Role::User);

    let (laptop, _) = backend.shop(TransitionPolicy::Enforce).await;
    laptop.auth().login(&Credentials::new("ada", "pw")).await.unwrap();
    laptop.favourites().toggle_product(&scarf(), None).await.unwrap();
    laptop
        .favourites()
        .toggle_product(&ProductId::new("mug"), None)
        .await
        .unwrap();

    let (phone, _) = backend.shop(TransitionPolicy::Enforce).await;
    phone.auth().login(&Credentials::new("ada", "pw")).await.unwrap();
    assert!(phone.favourites().list().await.is_empty());

    let set = phone.favourites().fetch().await.unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&scarf()));
    assert_eq!(set.items()[0].name, "Wool Scarf");
}

#[tokio::test]
async fn test_backend_failure_keeps_membership() {
    let backend = MockBackend::start().await;
    seed(&backend);
    backend.add_account("ada", "pw", Role::User);
    let (shop, notifier) = backend.shop(TransitionPolicy::Enforce).await;
    shop.auth().login(&Credentials::new("ada", "pw")).await.unwrap();
    shop.catalog().list(&Default::default()).await.unwrap();
    notifier.take();

    backend.fail_next(StatusCode::INTERNAL_SERVER_ERROR, "Server error");
    let err = shop.favourites().toggle_product(&scarf(), None).await.unwrap_err();

    assert!(matches!(err, ClientError::Api(_)));
    assert!(!shop.favourites().contains(&scarf()).await);
    let notes = notifier.take();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].variant, Variant::Destructive);
    assert_eq!(notes[0].description.as_deref(), Some("Server error"));
}

#[tokio::test]
async fn test_guest_favourites_stay_on_device() {
    let backend = MockBackend::start().await;
    seed(&backend);
    let dir = temp_dir();

    let (shop, _) = backend.shop_in(&dir, TransitionPolicy::Enforce).await;
    assert!(shop.favourites().toggle_product(&scarf(), Some("M".into())).await.unwrap());
    drop(shop);

    let (reopened, _) = backend.shop_in(&dir, TransitionPolicy::Enforce).await;
    let favourites = reopened.favourites().list().await;
    assert_eq!(favourites.len(), 1);
    assert_eq!(favourites.items()[0].size.as_deref(), Some("M"));

    assert!(backend.requests_to("favourites").is_empty());
    assert!(backend.requests_to("user/").is_empty());
}

#[tokio::test]
async fn test_unknown_product_is_not_favourited() {
    let backend = MockBackend::start().await;
    seed(&backend);
    let (shop, _) = backend.shop(TransitionPolicy::Enforce).await;

    let err = shop
        .favourites()
        .toggle_product(&ProductId::new("ghost"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::ProductNotFound(ref id) if id.as_str() == "ghost"));
    assert!(shop.favourites().list().await.is_empty());
}

#[tokio::test]
async fn test_guest_and_account_favourites_stay_separate() {
    let backend = MockBackend::start().await;
    seed(&backend);
    backend.add_account("ada", "pw", Role::User);
    let mug = ProductId::new("mug");
    let dir = temp_dir();

    let (shop, _) = backend.shop_in(&dir, TransitionPolicy::Enforce).await;
    assert!(shop.favourites().toggle_product(&mug, None).await.unwrap());

    shop.auth().login(&Credentials::new("ada", "pw")).await.unwrap();
    assert!(!shop.favourites().contains(&mug).await);
    assert!(shop.favourites().list().await.is_empty());

    assert!(shop.favourites().toggle_product(&scarf(), None).await.unwrap());
    assert_eq!(backend.favourites_of("ada").len(), 1);
    assert!(backend.requests_to("favourites/remove").is_empty());

    shop.auth().logout().await.unwrap();
    assert!(shop.favourites().contains(&mug).await);
    assert!(!shop.favourites().contains(&scarf()).await);
    drop(shop);

    let (reopened, _) = backend.shop_in(&dir, TransitionPolicy::Enforce).await;
    let favourites = reopened.favourites().list().await;
    assert_eq!(favourites.len(), 1);
    assert!(favourites.contains(&mug));
    assert_eq!(backend.favourites_of("ada").len(), 1);
}
