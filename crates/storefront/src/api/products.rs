//! Catalog endpoints.

use reqwest::Method;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument};

use polar_scoop_core::{CategoryId, ProductId};

use super::cache::CacheValue;
use super::types::{Product, ProductPage};
use super::{ApiError, PlatformClient, PlatformSession};

/// Catalog filter parameters, passed through to the platform's query string.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Free-text search keyword.
    pub keyword: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Minimum price filter.
    pub price_min: Option<Decimal>,
    /// Maximum price filter.
    pub price_max: Option<Decimal>,
    /// Category filter.
    pub category: Option<CategoryId>,
    /// Minimum average rating filter.
    pub min_rating: Option<f64>,
}

impl ProductQuery {
    /// Query pairs in the platform's `price[gte]`-style syntax.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(keyword) = &self.keyword {
            pairs.push(("keyword", keyword.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(min) = self.price_min {
            pairs.push(("price[gte]", min.to_string()));
        }
        if let Some(max) = self.price_max {
            pairs.push(("price[lte]", max.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(rating) = self.min_rating {
            pairs.push(("ratings[gte]", rating.to_string()));
        }
        pairs
    }

    /// Keyword searches are not cached; everything else is.
    fn cache_key(&self) -> Option<String> {
        if self.keyword.is_some() {
            return None;
        }
        Some(format!(
            "products:{}:{}:{}:{}:{}",
            self.page.unwrap_or(1),
            self.price_min.map_or_else(String::new, |d| d.to_string()),
            self.price_max.map_or_else(String::new, |d| d.to_string()),
            self.category.as_ref().map_or("", |c| c.as_str()),
            self.min_rating.map_or_else(String::new, |r| r.to_string()),
        ))
    }
}

#[derive(Deserialize)]
struct ProductEnvelope {
    product: Product,
}

impl PlatformClient {
    /// Fetch a page of the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let cache_key = query.cache_key();

        if let Some(key) = &cache_key
            && let Some(CacheValue::Products(page)) = self.cache_get(key).await
        {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let req = self
            .request(Method::GET, "/products")
            .query(&query.to_pairs());
        let page: ProductPage = self.execute(req).await?;

        if let Some(key) = cache_key {
            self.cache_insert(key, CacheValue::Products(page.clone()))
                .await;
        }

        Ok(page)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.cache_get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let req = self.request(Method::GET, &format!("/products/{id}"));
        let envelope: ProductEnvelope = self.execute(req).await?;

        self.cache_insert(
            cache_key,
            CacheValue::Product(Box::new(envelope.product.clone())),
        )
        .await;

        Ok(envelope.product)
    }

    /// Fetch a product bypassing the cache.
    ///
    /// Used where a stale stock figure matters: refreshing cart snapshots
    /// right before an order is placed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_fresh(&self, id: &ProductId) -> Result<Product, ApiError> {
        let req = self.request(Method::GET, &format!("/products/{id}"));
        let envelope: ProductEnvelope = self.execute(req).await?;
        Ok(envelope.product)
    }

    /// Create a product listing (vendor/admin).
    ///
    /// The image travels as multipart alongside the fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing is rejected or the upload fails.
    #[instrument(skip(self, session, image), fields(name = %draft.name))]
    pub async fn create_product(
        &self,
        draft: &ProductDraft,
        image: Option<UploadPart>,
        session: &PlatformSession,
    ) -> Result<Product, ApiError> {
        let mut form = reqwest::multipart::Form::new()
            .text("name", draft.name.clone())
            .text("description", draft.description.clone())
            .text("price", draft.price.to_string())
            .text("stock", draft.stock.to_string());

        if let Some(category) = &draft.category {
            form = form.text("category", category.to_string());
        }

        if let Some(image) = image {
            form = form.part("image", image.into_part()?);
        }

        let req = Self::with_session(
            self.request(Method::POST, "/products/new").multipart(form),
            Some(session),
        );

        let envelope: ProductEnvelope = self.execute(req).await?;
        Ok(envelope.product)
    }

    /// Delete a product listing (vendor/admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the deletion.
    #[instrument(skip(self, session), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        id: &ProductId,
        session: &PlatformSession,
    ) -> Result<(), ApiError> {
        let req = Self::with_session(
            self.request(Method::DELETE, &format!("/products/{id}")),
            Some(session),
        );
        let _: serde_json::Value = self.execute(req).await?;
        self.invalidate_product(id.as_str()).await;
        Ok(())
    }
}

/// Fields for a new product listing.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    /// Product name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Initial stock.
    pub stock: i64,
    /// Owning category.
    pub category: Option<CategoryId>,
}

/// An uploaded file forwarded to the platform as a multipart part.
#[derive(Debug, Clone)]
pub struct UploadPart {
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

impl UploadPart {
    pub(super) fn into_part(self) -> Result<reqwest::multipart::Part, ApiError> {
        reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)
            .map_err(ApiError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_use_platform_syntax() {
        let query = ProductQuery {
            keyword: Some("kulfi".to_string()),
            page: Some(2),
            price_min: Some(Decimal::new(100, 0)),
            price_max: Some(Decimal::new(500, 0)),
            category: Some(CategoryId::new("cat-kulfi")),
            min_rating: Some(4.0),
        };

        let pairs = query.to_pairs();
        assert!(pairs.contains(&("keyword", "kulfi".to_string())));
        assert!(pairs.contains(&("price[gte]", "100".to_string())));
        assert!(pairs.contains(&("price[lte]", "500".to_string())));
        assert!(pairs.contains(&("ratings[gte]", "4".to_string())));
    }

    #[test]
    fn test_empty_query_produces_no_pairs() {
        assert!(ProductQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn test_keyword_searches_are_not_cached() {
        let query = ProductQuery {
            keyword: Some("mango".to_string()),
            ..ProductQuery::default()
        };
        assert!(query.cache_key().is_none());

        let query = ProductQuery {
            page: Some(3),
            ..ProductQuery::default()
        };
        assert!(query.cache_key().is_some());
    }

    #[test]
    fn test_cache_key_distinguishes_filters() {
        let a = ProductQuery {
            page: Some(1),
            ..ProductQuery::default()
        };
        let b = ProductQuery {
            page: Some(1),
            category: Some(CategoryId::new("cat-sorbet")),
            ..ProductQuery::default()
        };
        assert_ne!(a.cache_key(), b.cache_key());
    }
}
