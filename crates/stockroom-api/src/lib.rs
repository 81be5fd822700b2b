//! JSON REST API for Stockroom.
//!
//! Exposes an axum [`Router`] backed by an [`InventoryService`] over any
//! [`ItemStore`]. TLS, auth and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", stockroom_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod inventories;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use stockroom_core::{InventoryService, store::ItemStore};

pub use error::ApiError;

/// Build the API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<InventoryService<S>>) -> Router<()>
where
  S: ItemStore + 'static,
{
  Router::new()
    .route(
      "/inventories",
      get(inventories::list::<S>).post(inventories::create::<S>),
    )
    .route("/inventories/low-stock", get(inventories::low_stock::<S>))
    .route("/inventories/summary", get(inventories::summary::<S>))
    .route(
      "/inventories/{id}",
      get(inventories::get_one::<S>)
        .put(inventories::update::<S>)
        .delete(inventories::delete::<S>),
    )
    .route("/inventories/{id}/increase", post(inventories::increase::<S>))
    .route("/inventories/{id}/decrease", post(inventories::decrease::<S>))
    .route(
      "/inventories/{id}/availability",
      get(inventories::availability::<S>),
    )
    .with_state(service)
}
