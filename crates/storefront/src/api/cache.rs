//! Cache value type for the platform API client.

use super::types::{Banner, Category, ContentItem, Product, ProductPage};

/// Cached platform responses.
///
/// Only catalog and content reads are cached; anything a shopper can mutate
/// goes to the platform every time.
#[derive(Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductPage),
    Categories(Vec<Category>),
    Banners(Vec<Banner>),
    Content(Vec<ContentItem>),
}
