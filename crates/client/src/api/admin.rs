//! Admin product endpoints. Create and update are multipart uploads.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use shopfront_core::catalog::ProductDraft;
use shopfront_core::types::ProductId;
use tracing::instrument;

use super::{ApiClient, ApiError, Scope};

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if an image cannot be read or the request fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<(), ApiError> {
        let form = product_form(draft).await?;
        let request = self
            .request(Method::POST, "admin/createProduct", Scope::Admin)
            .multipart(form);
        self.send_empty(request).await?;
        self.invalidate_catalogue();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if an image cannot be read or the request fails.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(&self, id: &ProductId, draft: &ProductDraft) -> Result<(), ApiError> {
        let form = product_form(draft).await?;
        let path = format!("admin/updateProduct/{id}");
        let request = self.request(Method::PUT, &path, Scope::Admin).multipart(form);
        self.send_empty(request).await?;
        self.invalidate_catalogue();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        let path = format!("admin/deleteProduct/{id}");
        self.send_empty(self.request(Method::DELETE, &path, Scope::Admin))
            .await?;
        self.invalidate_catalogue();
        Ok(())
    }
}

/// Text fields of the product form, in submission order.
fn text_fields(draft: &ProductDraft) -> Result<Vec<(&'static str, String)>, ApiError> {
    let mut fields = vec![
        ("name", draft.name.trim().to_string()),
        ("description", draft.description.trim().to_string()),
        ("price", draft.price.unwrap_or_default().to_string()),
        ("category", draft.category.trim().to_string()),
        ("stock", draft.stock.unwrap_or_default().to_string()),
        ("inStock", draft.in_stock.to_string()),
        ("featuredAt", draft.featured.to_string()),
    ];
    fields.extend(draft.features.iter().map(|f| ("features", f.clone())));
    fields.extend(draft.sizes.iter().map(|s| ("size", s.clone())));
    for image in &draft.existing_images {
        let json = serde_json::to_string(image).map_err(|e| ApiError::Parse(e.to_string()))?;
        fields.push(("existingImages", json));
    }
    Ok(fields)
}

async fn product_form(draft: &ProductDraft) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in text_fields(draft)? {
        form = form.text(name, value);
    }

    for path in &draft.new_images {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Upload {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        form = form.part("images", Part::bytes(bytes).file_name(file_name));
    }
    Ok(form)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal_macros::dec;
    use shopfront_core::catalog::ProductImage;
    use shopfront_core::types::ImageId;

    use super::*;

    #[test]
    fn test_text_fields_repeat_list_values() {
        let mut draft = ProductDraft::new();
        draft.name = " Desk Lamp ".into();
        draft.description = "Warm light".into();
        draft.price = Some(dec!(49.5));
        draft.stock = Some(12);
        draft.add_feature("Dimmable");
        draft.add_feature("USB-C");
        draft.add_size("S");
        draft.existing_images.push(ProductImage {
            url: "https://cdn/lamp.jpg".into(),
            public_id: Some(ImageId::new("lamp")),
        });

        let fields = text_fields(&draft).unwrap();
        let get = |key: &str| -> Vec<&str> {
            fields
                .iter()
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
                .collect()
        };
        assert_eq!(get("name"), ["Desk Lamp"]);
        assert_eq!(get("price"), ["49.5"]);
        assert_eq!(get("inStock"), ["true"]);
        assert_eq!(get("featuredAt"), ["false"]);
        assert_eq!(get("features"), ["Dimmable", "USB-C"]);
        assert_eq!(get("size"), ["S"]);

        let existing: serde_json::Value = serde_json::from_str(get("existingImages")[0]).unwrap();
        assert_eq!(existing["publicId"], "lamp");
    }

    #[tokio::test]
    async fn test_missing_upload_file_is_reported() {
        let mut draft = ProductDraft::new();
        draft.new_images.push("/definitely/not/here.jpg".into());
        let err = product_form(&draft).await.unwrap_err();
        assert!(matches!(err, ApiError::Upload { ref path, .. } if path.ends_with("here.jpg")));
    }
}
