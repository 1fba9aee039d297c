//! RPC handlers for the item operations
//!
//! Thin bridge layer: read the identity the middleware attached, hand the
//! envelope to the service, and let ServiceError pick the wire status.

use axum::{extract::Extension, Json};

use crate::common::auth::Identity;
use crate::common::ServiceError;
use crate::domains::items::models::{Item, ItemQuery, Items, SearchQuery};
use crate::server::app::AxumAppState;

pub async fn add_item(
    Extension(state): Extension<AxumAppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ItemQuery>,
) -> Result<Json<Item>, ServiceError> {
    Ok(Json(state.items.add_item(&identity, req).await?))
}

pub async fn get_item(
    Extension(state): Extension<AxumAppState>,
    Json(req): Json<ItemQuery>,
) -> Result<Json<Item>, ServiceError> {
    Ok(Json(state.items.get_item(req).await?))
}

pub async fn get_items(
    Extension(state): Extension<AxumAppState>,
    Json(_req): Json<ItemQuery>,
) -> Result<Json<Items>, ServiceError> {
    let items = state.items.get_items().await?;
    Ok(Json(Items { items }))
}

pub async fn update_item(
    Extension(state): Extension<AxumAppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ItemQuery>,
) -> Result<Json<Item>, ServiceError> {
    Ok(Json(state.items.update_item(&identity, req).await?))
}

pub async fn delete_item(
    Extension(state): Extension<AxumAppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<ItemQuery>,
) -> Result<Json<ItemQuery>, ServiceError> {
    Ok(Json(state.items.delete_item(&identity, req).await?))
}

pub async fn search(
    Extension(state): Extension<AxumAppState>,
    Json(req): Json<SearchQuery>,
) -> Result<Json<Items>, ServiceError> {
    let items = state.items.search(req).await?;
    Ok(Json(Items { items }))
}
