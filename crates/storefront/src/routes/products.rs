//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use polar_scoop_core::{CategoryId, ProductId};

use crate::api::ProductQuery;
use crate::api::types::{Category, ProductPage};
use crate::error::Result;
use crate::state::AppState;

/// Filter parameters accepted on `/products`, in the same bracketed syntax
/// the platform uses so links can be passed through untouched.
#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    pub keyword: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "price[gte]")]
    pub price_gte: Option<Decimal>,
    #[serde(rename = "price[lte]")]
    pub price_lte: Option<Decimal>,
    pub category: Option<CategoryId>,
    #[serde(rename = "ratings[gte]")]
    pub ratings_gte: Option<f64>,
}

impl From<CatalogParams> for ProductQuery {
    fn from(params: CatalogParams) -> Self {
        Self {
            keyword: params.keyword.filter(|k| !k.trim().is_empty()),
            page: params.page,
            price_min: params.price_gte,
            price_max: params.price_lte,
            category: params.category,
            min_rating: params.ratings_gte,
        }
    }
}

/// Browse screen data: one catalog page plus the category list for filters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    #[serde(flatten)]
    pub page: ProductPage,
    pub categories: Vec<Category>,
}

/// Product listing with filter passthrough.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<CatalogView>> {
    let query = ProductQuery::from(params);

    let page = state.platform().list_products(&query).await?;
    let categories = state.platform().list_categories().await?;

    Ok(Json(CatalogView { page, categories }))
}

/// Product detail.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<crate::api::types::Product>> {
    let product = state.platform().get_product(&id).await?;
    Ok(Json(product))
}
