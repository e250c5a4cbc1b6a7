//! Category endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use polar_scoop_core::CategoryId;

use super::cache::CacheValue;
use super::types::Category;
use super::{ApiError, PlatformClient, PlatformSession};

#[derive(Deserialize)]
struct CategoriesEnvelope {
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct CategoryEnvelope {
    category: Category,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
}

impl PlatformClient {
    /// Fetch all categories (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.cache_get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let req = self.request(Method::GET, "/categories");
        let envelope: CategoriesEnvelope = self.execute(req).await?;

        self.cache_insert(cache_key, CacheValue::Categories(envelope.categories.clone()))
            .await;

        Ok(envelope.categories)
    }

    /// Create a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the category.
    #[instrument(skip(self, session))]
    pub async fn create_category(
        &self,
        name: &str,
        image_url: Option<&str>,
        session: &PlatformSession,
    ) -> Result<Category, ApiError> {
        let req = Self::with_session(
            self.request(Method::POST, "/categories")
                .json(&CategoryBody { name, image_url }),
            Some(session),
        );
        let envelope: CategoryEnvelope = self.execute(req).await?;
        self.invalidate_all().await;
        Ok(envelope.category)
    }

    /// Rename or re-image a category (admin).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the category does not exist.
    #[instrument(skip(self, session), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        name: &str,
        image_url: Option<&str>,
        session: &PlatformSession,
    ) -> Result<Category, ApiError> {
        let req = Self::with_session(
            self.request(Method::PUT, &format!("/categories/{id}"))
                .json(&CategoryBody { name, image_url }),
            Some(session),
        );
        let envelope: CategoryEnvelope = self.execute(req).await?;
        self.invalidate_all().await;
        Ok(envelope.category)
    }

    /// Delete a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the deletion.
    #[instrument(skip(self, session), fields(category_id = %id))]
    pub async fn delete_category(
        &self,
        id: &CategoryId,
        session: &PlatformSession,
    ) -> Result<(), ApiError> {
        let req = Self::with_session(
            self.request(Method::DELETE, &format!("/categories/{id}")),
            Some(session),
        );
        let _: serde_json::Value = self.execute(req).await?;
        self.invalidate_all().await;
        Ok(())
    }
}
