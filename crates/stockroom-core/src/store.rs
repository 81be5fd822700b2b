//! The `ItemStore` trait and its summary type.
//!
//! The trait is implemented by storage backends (e.g.
//! `stockroom-store-sqlite`). [`crate::service::InventoryService`] depends on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  item::{InventoryItem, ItemFields, ItemId},
  query::{ItemPage, ItemQuery},
  stock::StockAdjustment,
};

/// Counts over all live items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
  pub total_products:        u64,
  pub active_products:       u64,
  pub inactive_products:     u64,
  pub low_stock_products:    u64,
  pub out_of_stock_products: u64,
}

/// Abstraction over an inventory item store.
///
/// Soft-deleted items are invisible to every method: they are never returned,
/// counted, updated, or adjusted.
///
/// Quantity changes other than a full [`update_item`](Self::update_item) go
/// through [`increase_stock`](Self::increase_stock) and
/// [`decrease_stock`](Self::decrease_stock), which must evaluate their guard
/// and apply the change as one atomic step inside the store.
pub trait ItemStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Lifecycle ─────────────────────────────────────────────────────────

  /// Persist a new item. `id` and timestamps are assigned by the store.
  fn create_item(
    &self,
    fields: ItemFields,
  ) -> impl Future<Output = Result<InventoryItem, Self::Error>> + Send + '_;

  /// Retrieve a live item. Returns `None` if missing or soft-deleted.
  fn get_item(
    &self,
    id: ItemId,
  ) -> impl Future<Output = Result<Option<InventoryItem>, Self::Error>> + Send + '_;

  /// Overwrite every field of a live item. Returns `None` if there is none.
  fn update_item(
    &self,
    id: ItemId,
    fields: ItemFields,
  ) -> impl Future<Output = Result<Option<InventoryItem>, Self::Error>> + Send + '_;

  /// Soft-delete an item. Returns `false` if it was missing or already
  /// deleted.
  fn delete_item(
    &self,
    id: ItemId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// One page of items matching `query`, plus the total match count.
  fn list_items<'a>(
    &'a self,
    query: &'a ItemQuery,
  ) -> impl Future<Output = Result<ItemPage, Self::Error>> + Send + 'a;

  /// All live items with `quantity < min_stock`.
  fn low_stock_items(
    &self,
  ) -> impl Future<Output = Result<Vec<InventoryItem>, Self::Error>> + Send + '_;

  fn summary(
    &self,
  ) -> impl Future<Output = Result<InventorySummary, Self::Error>> + Send + '_;

  // ── Guarded stock updates ─────────────────────────────────────────────

  /// Add `amount` unless the result would exceed
  /// [`MAX_QUANTITY`](crate::item::MAX_QUANTITY).
  fn increase_stock(
    &self,
    id: ItemId,
    amount: i64,
  ) -> impl Future<Output = Result<StockAdjustment, Self::Error>> + Send + '_;

  /// Subtract `amount` only if `quantity >= amount` at write time.
  fn decrease_stock(
    &self,
    id: ItemId,
    amount: i64,
  ) -> impl Future<Output = Result<StockAdjustment, Self::Error>> + Send + '_;
}
