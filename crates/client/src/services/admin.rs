//! Admin product management and the analytics dashboard.

use shopfront_core::analytics::Dashboard;
use shopfront_core::catalog::ProductDraft;
use shopfront_core::types::ProductId;
use tracing::instrument;

use super::{Notification, Shopfront};
use crate::error::Result;

/// Admin operations. All of them require an admin session.
#[derive(Clone, Copy)]
pub struct AdminService<'a> {
    pub(super) shop: &'a Shopfront,
}

impl AdminService<'_> {
    /// Validate and create a product.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Draft`](crate::ClientError::Draft) before any
    /// request if the draft is incomplete, or an error if the upload fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<()> {
        const TITLE: &str = "Failed to create product";
        self.shop.require_admin().await?;
        draft.validate().map_err(|e| self.shop.fail(TITLE, e))?;
        self.shop
            .api()
            .create_product(draft)
            .await
            .map_err(|e| self.shop.fail(TITLE, e))?;
        self.shop
            .notify(Notification::success("Product added successfully"));
        Ok(())
    }

    /// Validate and update a product.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Draft`](crate::ClientError::Draft) before any
    /// request if the draft is incomplete, or an error if the upload fails.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<()> {
        const TITLE: &str = "Failed to update product";
        self.shop.require_admin().await?;
        draft.validate().map_err(|e| self.shop.fail(TITLE, e))?;
        self.shop
            .api()
            .update_product(id, draft)
            .await
            .map_err(|e| self.shop.fail(TITLE, e))?;
        self.shop
            .notify(Notification::success("Product updated successfully!"));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.shop.require_admin().await?;
        self.shop
            .api()
            .delete_product(id)
            .await
            .map_err(|e| self.shop.fail("Failed to delete product", e))?;
        self.shop.notify(Notification::success("Product deleted"));
        Ok(())
    }

    /// Sales, order, product, and customer aggregates.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the four requests fails.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<Dashboard> {
        self.shop.require_admin().await?;
        let dashboard = self
            .shop
            .api()
            .dashboard()
            .await
            .map_err(|e| self.shop.fail("Failed to load analytics", e))?;
        Ok(dashboard)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::session::{AdminSession, BearerToken};
    use shopfront_core::types::Role;

    use super::*;
    use crate::error::ClientError;
    use crate::services::testing::offline_shop;
    use crate::services::{TransitionPolicy, Variant};

    #[tokio::test]
    async fn test_incomplete_draft_rejected_locally() {
        let (shop, notifier) = offline_shop(TransitionPolicy::Enforce).await;
        shop.store()
            .update(|s| {
                s.admin_auth = Some(AdminSession {
                    username: "root".into(),
                    token: BearerToken::new("t"),
                    role: Role::Admin,
                });
            })
            .await
            .unwrap();

        let err = shop
            .admin()
            .create_product(&ProductDraft::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Draft(_)));
        let destructive = notifier.of_variant(Variant::Destructive);
        assert_eq!(destructive.len(), 1);
        assert!(
            destructive
                .first()
                .and_then(|n| n.description.as_deref())
                .is_some_and(|d| d.contains("name"))
        );
    }

    #[tokio::test]
    async fn test_dashboard_requires_admin() {
        let (shop, _) = offline_shop(TransitionPolicy::Enforce).await;
        let err = shop.admin().dashboard().await.unwrap_err();
        assert!(matches!(err, ClientError::AdminRequired));
    }
}
