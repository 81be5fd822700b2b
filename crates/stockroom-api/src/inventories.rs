//! Handlers for `/inventories` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/inventories` | Filter, sort and page via query parameters |
//! | `POST`   | `/inventories` | 201 with the created item |
//! | `GET`    | `/inventories/low-stock` | Items with `quantity < min_stock` |
//! | `GET`    | `/inventories/summary` | Counts over live items |
//! | `GET`    | `/inventories/{id}` | 404 if missing or deleted |
//! | `PUT`    | `/inventories/{id}` | Full replacement of the editable fields |
//! | `DELETE` | `/inventories/{id}` | 204, also when already deleted |
//! | `POST`   | `/inventories/{id}/increase` | Body: `{"amount":n}` |
//! | `POST`   | `/inventories/{id}/decrease` | Body: `{"amount":n}`; 409 when short |
//! | `GET`    | `/inventories/{id}/availability` | `?amount=n` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use stockroom_core::{
  InventoryService,
  item::{ItemInput, ItemView},
  query::ItemFilter,
  service::ItemList,
  store::{InventorySummary, ItemStore},
};

use crate::error::ApiError;

type Service<S> = State<Arc<InventoryService<S>>>;

// ─── Collection ───────────────────────────────────────────────────────────────

/// `GET /inventories[?search=..&stock=lowstock&sort_by=name&page=2..]`
pub async fn list<S: ItemStore>(
  State(service): Service<S>,
  Query(filter): Query<ItemFilter>,
) -> Result<Json<ItemList>, ApiError> {
  Ok(Json(service.list_items(filter).await?))
}

/// `POST /inventories`
pub async fn create<S: ItemStore>(
  State(service): Service<S>,
  Json(input): Json<ItemInput>,
) -> Result<impl IntoResponse, ApiError> {
  let item = service.create_item(input).await?;
  Ok((StatusCode::CREATED, Json(item)))
}

/// `GET /inventories/low-stock`
pub async fn low_stock<S: ItemStore>(
  State(service): Service<S>,
) -> Result<Json<Vec<ItemView>>, ApiError> {
  Ok(Json(service.low_stock_items().await?))
}

/// `GET /inventories/summary`
pub async fn summary<S: ItemStore>(
  State(service): Service<S>,
) -> Result<Json<InventorySummary>, ApiError> {
  Ok(Json(service.summary().await?))
}

// ─── Single item ──────────────────────────────────────────────────────────────

/// `GET /inventories/{id}`
pub async fn get_one<S: ItemStore>(
  State(service): Service<S>,
  Path(id): Path<i64>,
) -> Result<Json<ItemView>, ApiError> {
  Ok(Json(service.get_item(id).await?))
}

/// `PUT /inventories/{id}`
pub async fn update<S: ItemStore>(
  State(service): Service<S>,
  Path(id): Path<i64>,
  Json(input): Json<ItemInput>,
) -> Result<Json<ItemView>, ApiError> {
  Ok(Json(service.update_item(id, input).await?))
}

/// `DELETE /inventories/{id}`
pub async fn delete<S: ItemStore>(
  State(service): Service<S>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  service.delete_item(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Stock ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AmountBody {
  pub amount: i64,
}

/// `POST /inventories/{id}/increase`, body: `{"amount":10}`
pub async fn increase<S: ItemStore>(
  State(service): Service<S>,
  Path(id): Path<i64>,
  Json(body): Json<AmountBody>,
) -> Result<Json<ItemView>, ApiError> {
  Ok(Json(service.increase_stock(id, body.amount).await?))
}

/// `POST /inventories/{id}/decrease`, body: `{"amount":3}`
pub async fn decrease<S: ItemStore>(
  State(service): Service<S>,
  Path(id): Path<i64>,
  Json(body): Json<AmountBody>,
) -> Result<Json<ItemView>, ApiError> {
  Ok(Json(service.decrease_stock(id, body.amount).await?))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
  pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Availability {
  pub id:        i64,
  pub amount:    i64,
  pub available: bool,
}

/// `GET /inventories/{id}/availability?amount=n`
pub async fn availability<S: ItemStore>(
  State(service): Service<S>,
  Path(id): Path<i64>,
  Query(params): Query<AvailabilityParams>,
) -> Result<Json<Availability>, ApiError> {
  let available = service.check_availability(id, params.amount).await?;
  Ok(Json(Availability { id, amount: params.amount, available }))
}
