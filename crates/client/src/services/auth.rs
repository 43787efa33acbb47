//! Customer and admin sessions.

use shopfront_core::favourite::FavouriteSet;
use shopfront_core::session::{AdminSession, UserSession};
use tracing::instrument;

use super::{Notification, Shopfront};
use crate::api::Credentials;
use crate::error::{ClientError, Result};
use crate::storage::keys;

/// Session operations.
#[derive(Clone, Copy)]
pub struct AuthService<'a> {
    pub(super) shop: &'a Shopfront,
}

impl AuthService<'_> {
    /// The signed-in customer, if any.
    pub async fn current_user(&self) -> Option<UserSession> {
        self.shop.store().read(|s| s.auth.clone()).await
    }

    /// The signed-in admin, if any.
    pub async fn current_admin(&self) -> Option<AdminSession> {
        self.shop.store().read(|s| s.admin_auth.clone()).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<UserSession> {
        let session = self
            .shop
            .api()
            .login(credentials)
            .await
            .map_err(|e| self.shop.fail("Login failed", e))?;
        self.start_session(session, "Welcome back").await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn register(&self, credentials: &Credentials) -> Result<UserSession> {
        let session = self
            .shop
            .api()
            .register(credentials)
            .await
            .map_err(|e| self.shop.fail("Register failed", e))?;
        self.start_session(session, "Account created").await
    }

    /// End the customer session.
    ///
    /// Drops the session, cached cart, and order caches, and removes the
    /// `user`, `cartItems`, and `order` storage keys. The account's favourites
    /// are dropped and the guest set stored under `favourites` comes back.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        let guest_favourites = self
            .shop
            .store()
            .storage()
            .get::<FavouriteSet>(keys::FAVOURITES)
            .await?
            .unwrap_or_default();
        self.shop
            .store()
            .update(|s| {
                s.auth = None;
                s.favourites = guest_favourites;
                s.cart.clear();
                s.promo = None;
                s.orders.history.clear();
                s.orders.current = None;
            })
            .await?;
        self.shop
            .store()
            .storage()
            .remove(&[keys::USER, keys::CART_ITEMS, keys::ORDER])
            .await?;
        self.shop.api().set_customer_token(None);
        self.shop.notify(Notification::info("Signed out"));
        Ok(())
    }

    /// Sign in as an administrator.
    ///
    /// A non-admin role is refused locally and nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Session`] for a non-admin account, or an error if
    /// the backend rejects the credentials.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn admin_login(&self, credentials: &Credentials, remember_me: bool) -> Result<AdminSession> {
        let response = self
            .shop
            .api()
            .admin_login(credentials, remember_me)
            .await
            .map_err(|e| self.shop.fail("Admin login failed", e))?;
        let session = AdminSession::try_from(response)
            .map_err(|e| self.shop.fail("Admin login failed", ClientError::from(e)))?;

        self.shop
            .store()
            .update(|s| s.admin_auth = Some(session.clone()))
            .await?;
        self.shop
            .store()
            .storage()
            .set(keys::ADMIN, &session)
            .await?;
        self.shop.api().set_admin_token(Some(session.token.clone()));

        tracing::info!(username = %session.username, "Admin signed in");
        self.shop.notify(Notification::success("Admin login successful"));
        Ok(session)
    }

    /// End the admin session and drop the cached admin order list.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    #[instrument(skip(self))]
    pub async fn admin_logout(&self) -> Result<()> {
        self.shop
            .store()
            .update(|s| {
                s.admin_auth = None;
                s.orders.admin.clear();
            })
            .await?;
        self.shop.store().storage().remove(&[keys::ADMIN]).await?;
        self.shop.api().set_admin_token(None);
        self.shop.notify(Notification::info("Admin signed out"));
        Ok(())
    }

    async fn start_session(&self, session: UserSession, greeting: &str) -> Result<UserSession> {
        self.shop
            .store()
            .update(|s| {
                s.auth = Some(session.clone());
                // The account's set arrives through `fetch`.
                s.favourites.clear();
            })
            .await?;
        self.shop
            .store()
            .storage()
            .set(keys::USER, &session)
            .await?;
        self.shop.api().set_customer_token(Some(session.token.clone()));

        tracing::info!(username = %session.username, "Customer signed in");
        self.shop
            .notify(Notification::success(format!("{greeting}, {}", session.username)));
        Ok(session)
    }
}
