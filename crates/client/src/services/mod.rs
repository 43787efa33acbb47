//! Storefront workflows.
//!
//! Each service pairs API calls with store updates and notifications. The
//! pattern is the same throughout: call the backend, and only on success
//! replace the cached copy and persist. A failure leaves the store untouched
//! and raises one destructive [`Notification`].

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favourites;
pub mod notify;
pub mod orders;

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::storage::LocalStorage;
use crate::store::Store;

pub use admin::AdminService;
pub use auth::AuthService;
pub use cart::CartService;
pub use catalog::CatalogService;
pub use favourites::FavouritesService;
pub use notify::{MemoryNotifier, Notification, Notifier, TracingNotifier, Variant};
pub use orders::{OrdersService, TransitionPolicy};

/// Entry point: the API client, the state store, and a notifier.
#[derive(Clone)]
pub struct Shopfront {
    api: ApiClient,
    store: Store,
    notifier: Arc<dyn Notifier>,
    policy: TransitionPolicy,
}

impl Shopfront {
    /// Open the store in the configured data dir and connect to the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or local storage
    /// cannot be read.
    pub async fn open(config: &ClientConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let api = ApiClient::new(&config.api_url, config.cache_ttl)?;
        let store = Store::load(LocalStorage::open(&config.data_dir)).await?;
        tracing::info!(
            api_url = %config.api_url,
            data_dir = %config.data_dir.display(),
            "Shopfront client ready"
        );
        Ok(Self::new(api, store, notifier, config.transition_policy).await)
    }

    /// Assemble from parts, restoring session tokens from the store.
    pub async fn new(
        api: ApiClient,
        store: Store,
        notifier: Arc<dyn Notifier>,
        policy: TransitionPolicy,
    ) -> Self {
        let (customer, admin) = store
            .read(|s| {
                (
                    s.auth.as_ref().map(|a| a.token.clone()),
                    s.admin_auth.as_ref().map(|a| a.token.clone()),
                )
            })
            .await;
        api.set_customer_token(customer);
        api.set_admin_token(admin);

        Self {
            api,
            store,
            notifier,
            policy,
        }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    #[must_use]
    pub const fn auth(&self) -> AuthService<'_> {
        AuthService { shop: self }
    }

    #[must_use]
    pub const fn catalog(&self) -> CatalogService<'_> {
        CatalogService { shop: self }
    }

    #[must_use]
    pub const fn cart(&self) -> CartService<'_> {
        CartService { shop: self }
    }

    #[must_use]
    pub const fn orders(&self) -> OrdersService<'_> {
        OrdersService { shop: self }
    }

    #[must_use]
    pub const fn favourites(&self) -> FavouritesService<'_> {
        FavouritesService { shop: self }
    }

    #[must_use]
    pub const fn admin(&self) -> AdminService<'_> {
        AdminService { shop: self }
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Raise a destructive notification for `err` and hand it back.
    pub(crate) fn fail(&self, title: &str, err: impl Into<ClientError>) -> ClientError {
        let err = err.into();
        tracing::warn!(error = %err, title, "Action failed");
        self.notify(Notification::destructive(title, err.to_string()));
        err
    }

    /// Require an admin session.
    pub(crate) async fn require_admin(&self) -> Result<()> {
        if self.store.read(|s| s.admin_auth.is_some()).await {
            Ok(())
        } else {
            Err(self.fail("Access denied", ClientError::AdminRequired))
        }
    }
}

impl std::fmt::Debug for Shopfront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shopfront")
            .field("api", &self.api)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
