//! Persisted client-side state store.
//!
//! One [`State`] value, shared behind an async `RwLock` and written under the
//! `root` storage key after every mutation. The backend stays authoritative;
//! the store only caches what it last returned.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shopfront_core::cart::Cart;
use shopfront_core::favourite::FavouriteSet;
use shopfront_core::order::Order;
use shopfront_core::pricing::PromoCode;
use shopfront_core::session::{AdminSession, UserSession};
use tokio::sync::RwLock;

use crate::storage::{LocalStorage, StorageError, keys};

/// Order caches for the customer history and the admin list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersState {
    /// The signed-in customer's orders.
    pub history: Vec<Order>,
    /// The order just placed, shown on the confirmation page.
    pub current: Option<Order>,
    /// Every order, as loaded by an admin.
    pub admin: Vec<Order>,
}

/// Everything the client remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    pub auth: Option<UserSession>,
    pub admin_auth: Option<AdminSession>,
    pub cart: Cart,
    pub promo: Option<PromoCode>,
    pub orders: OrdersState,
    pub favourites: FavouriteSet,
}

impl State {
    /// Whether a customer is signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.auth.is_some()
    }
}

/// Shared handle to the state store.
#[derive(Clone, Debug)]
pub struct Store {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    state: RwLock<State>,
    storage: LocalStorage,
}

impl Store {
    /// Rehydrate the store from `storage`.
    ///
    /// Starts from the `root` snapshot. Guests get their favourites from the
    /// dedicated `favourites` key, which is the only place guest toggles are
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or holds invalid values.
    pub async fn load(storage: LocalStorage) -> Result<Self, StorageError> {
        let mut state: State = storage.get(keys::ROOT).await?.unwrap_or_default();

        if state.auth.is_none() {
            state.auth = storage.get(keys::USER).await?;
        }
        if state.admin_auth.is_none() {
            state.admin_auth = storage.get(keys::ADMIN).await?;
        }
        if !state.is_signed_in()
            && let Some(favourites) = storage.get::<FavouriteSet>(keys::FAVOURITES).await?
        {
            state.favourites = favourites;
        }

        tracing::debug!(
            signed_in = state.is_signed_in(),
            cart_lines = state.cart.len(),
            favourites = state.favourites.len(),
            "State store loaded"
        );

        Ok(Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(state),
                storage,
            }),
        })
    }

    /// The storage the store persists to.
    #[must_use]
    pub fn storage(&self) -> &LocalStorage {
        &self.inner.storage
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> State {
        self.inner.state.read().await.clone()
    }

    /// Read from the current state without cloning it.
    pub async fn read<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&*self.inner.state.read().await)
    }

    /// Mutate the state and persist the result under `root`.
    ///
    /// The write lock is held until the snapshot is on disk, so concurrent
    /// updates persist in the order they were applied.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails. The in-memory mutation has
    /// already been applied.
    pub async fn update<R>(&self, f: impl FnOnce(&mut State) -> R) -> Result<R, StorageError> {
        let mut state = self.inner.state.write().await;
        let result = f(&mut state);
        self.inner.storage.set(keys::ROOT, &*state).await?;
        Ok(result)
    }

    /// Copy part of the state under its own key, e.g. `cartItems`.
    ///
    /// Call after [`update`](Self::update): `root` already holds the value,
    /// so a failed copy is logged rather than returned.
    pub(crate) async fn mirror<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.inner.storage.set(key, value).await {
            tracing::warn!(error = %e, key, "Failed to write mirror key");
        }
    }

    /// Drop a mirror key. Failures are logged like [`mirror`](Self::mirror).
    pub(crate) async fn unmirror(&self, key: &str) {
        if let Err(e) = self.inner.storage.remove(&[key]).await {
            tracing::warn!(error = %e, key, "Failed to remove mirror key");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use shopfront_core::favourite::FavouriteItem;
    use shopfront_core::session::BearerToken;
    use shopfront_core::types::{Price, ProductId, Role};

    use super::*;
    use crate::storage::tests::temp_storage;

    fn favourite(id: &str) -> FavouriteItem {
        FavouriteItem {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            price: Price::new(dec!(10)),
            image: None,
            size: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_empty_storage_loads_default_state() {
        let store = Store::load(temp_storage()).await.unwrap();
        assert_eq!(store.snapshot().await, State::default());
    }

    #[tokio::test]
    async fn test_update_persists_under_root() {
        let storage = temp_storage();
        let store = Store::load(storage.clone()).await.unwrap();
        store
            .update(|state| state.promo = Some(PromoCode::Save10))
            .await
            .unwrap();

        let reloaded = Store::load(storage).await.unwrap();
        assert_eq!(reloaded.read(|s| s.promo).await, Some(PromoCode::Save10));
    }

    #[tokio::test]
    async fn test_guest_favourites_come_from_their_own_key() {
        let storage = temp_storage();
        let mut guest = FavouriteSet::default();
        guest.insert(favourite("a"));
        storage.set(keys::FAVOURITES, &guest).await.unwrap();

        let store = Store::load(storage.clone()).await.unwrap();
        assert!(store.read(|s| s.favourites.contains(&ProductId::new("a"))).await);
    }

    #[tokio::test]
    async fn test_signed_in_favourites_ignore_guest_key() {
        let storage = temp_storage();
        let mut guest = FavouriteSet::default();
        guest.insert(favourite("guest"));
        storage.set(keys::FAVOURITES, &guest).await.unwrap();
        storage
            .set(
                keys::USER,
                &UserSession {
                    id: None,
                    username: "ada".into(),
                    token: BearerToken::new("t"),
                    role: Role::User,
                },
            )
            .await
            .unwrap();

        let store = Store::load(storage).await.unwrap();
        let state = store.snapshot().await;
        assert!(state.is_signed_in());
        assert!(state.favourites.is_empty());
    }

    #[tokio::test]
    async fn test_mirror_writes_and_drops_key() {
        let storage = temp_storage();
        let store = Store::load(storage.clone()).await.unwrap();

        store.mirror(keys::CART_ITEMS, &["p1"]).await;
        let stored: Vec<String> = storage.get(keys::CART_ITEMS).await.unwrap().unwrap();
        assert_eq!(stored, ["p1"]);

        store.unmirror(keys::CART_ITEMS).await;
        assert!(!storage.contains(keys::CART_ITEMS).await.unwrap());
    }

    #[tokio::test]
    async fn test_mirror_failure_is_logged_not_raised() {
        let storage = temp_storage();
        let store = Store::load(storage.clone()).await.unwrap();
        store
            .update(|state| state.promo = Some(PromoCode::Save10))
            .await
            .unwrap();

        // Replace the backing file with a directory so every write fails.
        tokio::fs::remove_file(storage.path()).await.unwrap();
        tokio::fs::create_dir(storage.path()).await.unwrap();

        store.mirror(keys::ORDER, &"o1").await;
        store.unmirror(keys::CART_ITEMS).await;

        assert!(storage.contains(keys::ORDER).await.is_err());
        assert_eq!(store.read(|s| s.promo).await, Some(PromoCode::Save10));
    }
}
