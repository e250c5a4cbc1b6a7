//! Content endpoints: homepage banners and typed content blocks.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use polar_scoop_core::{BannerId, ContentItemId};

use super::cache::CacheValue;
use super::types::{Banner, ContentItem};
use super::{ApiError, PlatformClient, PlatformSession};

#[derive(Deserialize)]
struct BannersEnvelope {
    banners: Vec<Banner>,
}

#[derive(Deserialize)]
struct BannerEnvelope {
    banner: Banner,
}

#[derive(Deserialize)]
struct ItemsEnvelope {
    items: Vec<ContentItem>,
}

#[derive(Deserialize)]
struct ItemEnvelope {
    item: ContentItem,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BannerBody<'a> {
    title: &'a str,
    image_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentItemBody<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
}

impl PlatformClient {
    /// Fetch homepage banners (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn banners(&self) -> Result<Vec<Banner>, ApiError> {
        let cache_key = "banners".to_string();

        if let Some(CacheValue::Banners(banners)) = self.cache_get(&cache_key).await {
            debug!("Cache hit for banners");
            return Ok(banners);
        }

        let req = self.request(Method::GET, "/content/banners");
        let envelope: BannersEnvelope = self.execute(req).await?;

        self.cache_insert(cache_key, CacheValue::Banners(envelope.banners.clone()))
            .await;

        Ok(envelope.banners)
    }

    /// Fetch content items, optionally filtered by type (cached per type).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn content_items(&self, kind: Option<&str>) -> Result<Vec<ContentItem>, ApiError> {
        let cache_key = format!("content:{}", kind.unwrap_or(""));

        if let Some(CacheValue::Content(items)) = self.cache_get(&cache_key).await {
            debug!("Cache hit for content items");
            return Ok(items);
        }

        let mut req = self.request(Method::GET, "/content/items");
        if let Some(kind) = kind {
            req = req.query(&[("type", kind)]);
        }
        let envelope: ItemsEnvelope = self.execute(req).await?;

        self.cache_insert(cache_key, CacheValue::Content(envelope.items.clone()))
            .await;

        Ok(envelope.items)
    }

    /// Create a banner (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the banner.
    #[instrument(skip(self, session))]
    pub async fn create_banner(
        &self,
        title: &str,
        image_url: &str,
        link: Option<&str>,
        session: &PlatformSession,
    ) -> Result<Banner, ApiError> {
        let req = Self::with_session(
            self.request(Method::POST, "/content/banners")
                .json(&BannerBody {
                    title,
                    image_url,
                    link,
                }),
            Some(session),
        );
        let envelope: BannerEnvelope = self.execute(req).await?;
        self.invalidate_all().await;
        Ok(envelope.banner)
    }

    /// Delete a banner (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the deletion.
    #[instrument(skip(self, session), fields(banner_id = %id))]
    pub async fn delete_banner(
        &self,
        id: &BannerId,
        session: &PlatformSession,
    ) -> Result<(), ApiError> {
        let req = Self::with_session(
            self.request(Method::DELETE, &format!("/content/banners/{id}")),
            Some(session),
        );
        let _: serde_json::Value = self.execute(req).await?;
        self.invalidate_all().await;
        Ok(())
    }

    /// Create a content item (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the item.
    #[instrument(skip(self, session, body))]
    pub async fn create_content_item(
        &self,
        kind: &str,
        title: &str,
        body: Option<&str>,
        image_url: Option<&str>,
        session: &PlatformSession,
    ) -> Result<ContentItem, ApiError> {
        let req = Self::with_session(
            self.request(Method::POST, "/content/items")
                .json(&ContentItemBody {
                    kind,
                    title,
                    body,
                    image_url,
                }),
            Some(session),
        );
        let envelope: ItemEnvelope = self.execute(req).await?;
        self.invalidate_all().await;
        Ok(envelope.item)
    }

    /// Update a content item (admin).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the item does not exist.
    #[instrument(skip(self, session, body), fields(item_id = %id))]
    pub async fn update_content_item(
        &self,
        id: &ContentItemId,
        kind: &str,
        title: &str,
        body: Option<&str>,
        image_url: Option<&str>,
        session: &PlatformSession,
    ) -> Result<ContentItem, ApiError> {
        let req = Self::with_session(
            self.request(Method::PUT, &format!("/content/items/{id}"))
                .json(&ContentItemBody {
                    kind,
                    title,
                    body,
                    image_url,
                }),
            Some(session),
        );
        let envelope: ItemEnvelope = self.execute(req).await?;
        self.invalidate_all().await;
        Ok(envelope.item)
    }

    /// Delete a content item (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the deletion.
    #[instrument(skip(self, session), fields(item_id = %id))]
    pub async fn delete_content_item(
        &self,
        id: &ContentItemId,
        session: &PlatformSession,
    ) -> Result<(), ApiError> {
        let req = Self::with_session(
            self.request(Method::DELETE, &format!("/content/items/{id}")),
            Some(session),
        );
        let _: serde_json::Value = self.execute(req).await?;
        self.invalidate_all().await;
        Ok(())
    }
}
