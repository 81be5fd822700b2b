//! [`InventoryService`]: validation, error mapping and logging in front of an
//! [`ItemStore`].
//!
//! Every operation validates its input before the store is touched; a
//! rejected call never reaches the backend.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  error::ValidationError,
  item::{ItemId, ItemInput, ItemView},
  query::{ItemFilter, Pagination},
  stock::{StockAdjustment, validate_amount},
  store::{InventorySummary, ItemStore},
};

/// A page of annotated items with its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemList {
  pub data:       Vec<ItemView>,
  pub pagination: Pagination,
}

/// Which way a stock adjustment goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
  Increase,
  Decrease,
}

fn rejected(err: ValidationError) -> Error {
  tracing::warn!(error = %err, "rejected inventory request");
  Error::Validation(err)
}

fn store_failure<E>(op: &'static str) -> impl FnOnce(E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  move |err| {
    tracing::error!(op, error = %err, "inventory store failure");
    Error::store(err)
  }
}

pub struct InventoryService<S> {
  store: S,
}

impl<S: ItemStore> InventoryService<S> {
  pub fn new(store: S) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  // ── Lifecycle ─────────────────────────────────────────────────────────

  pub async fn create_item(&self, input: ItemInput) -> Result<ItemView> {
    let fields = input.validate().map_err(rejected)?;
    let item = self
      .store
      .create_item(fields)
      .await
      .map_err(store_failure("create_item"))?;

    tracing::info!(
      id = %item.id,
      name = %item.name,
      quantity = item.quantity,
      "created inventory item"
    );
    Ok(item.into())
  }

  pub async fn update_item(&self, id: i64, input: ItemInput) -> Result<ItemView> {
    let id = ItemId::checked(id).map_err(rejected)?;
    let fields = input.validate().map_err(rejected)?;
    let item = self
      .store
      .update_item(id, fields)
      .await
      .map_err(store_failure("update_item"))?
      .ok_or(Error::ItemNotFound(id))?;

    tracing::info!(id = %item.id, name = %item.name, "updated inventory item");
    Ok(item.into())
  }

  /// Soft delete. Deleting a missing or already-deleted item succeeds.
  pub async fn delete_item(&self, id: i64) -> Result<()> {
    let id = ItemId::checked(id).map_err(rejected)?;
    let deleted = self
      .store
      .delete_item(id)
      .await
      .map_err(store_failure("delete_item"))?;

    if deleted {
      tracing::info!(%id, "deleted inventory item");
    } else {
      tracing::debug!(%id, "delete of absent inventory item ignored");
    }
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get_item(&self, id: i64) -> Result<ItemView> {
    let id = ItemId::checked(id).map_err(rejected)?;
    self
      .store
      .get_item(id)
      .await
      .map_err(store_failure("get_item"))?
      .map(ItemView::from)
      .ok_or(Error::ItemNotFound(id))
  }

  pub async fn list_items(&self, filter: ItemFilter) -> Result<ItemList> {
    let query = filter.normalize();
    tracing::debug!(?query, "listing inventory items");

    let page = self
      .store
      .list_items(&query)
      .await
      .map_err(store_failure("list_items"))?;

    tracing::debug!(
      total_items = page.total_items,
      returned_items = page.items.len(),
      page = query.page,
      "listed inventory items"
    );

    Ok(ItemList {
      pagination: Pagination::new(query.page, query.limit, page.total_items),
      data:       page.items.into_iter().map(ItemView::from).collect(),
    })
  }

  pub async fn low_stock_items(&self) -> Result<Vec<ItemView>> {
    let items = self
      .store
      .low_stock_items()
      .await
      .map_err(store_failure("low_stock_items"))?;
    Ok(items.into_iter().map(ItemView::from).collect())
  }

  pub async fn summary(&self) -> Result<InventorySummary> {
    self.store.summary().await.map_err(store_failure("summary"))
  }

  /// Whether `amount` units are on hand right now. Advisory only: the answer
  /// may be stale by the time a caller acts on it.
  pub async fn check_availability(&self, id: i64, amount: i64) -> Result<bool> {
    let id = ItemId::checked(id).map_err(rejected)?;
    let amount = validate_amount(amount).map_err(rejected)?;
    let item = self
      .store
      .get_item(id)
      .await
      .map_err(store_failure("get_item"))?
      .ok_or(Error::ItemNotFound(id))?;
    Ok(item.quantity >= amount)
  }

  // ── Stock mutation ────────────────────────────────────────────────────

  pub async fn increase_stock(&self, id: i64, amount: i64) -> Result<ItemView> {
    self.adjust(id, amount, Direction::Increase).await
  }

  pub async fn decrease_stock(&self, id: i64, amount: i64) -> Result<ItemView> {
    self.adjust(id, amount, Direction::Decrease).await
  }

  async fn adjust(
    &self,
    id: i64,
    amount: i64,
    direction: Direction,
  ) -> Result<ItemView> {
    let id = ItemId::checked(id).map_err(rejected)?;
    let amount = validate_amount(amount).map_err(rejected)?;

    let outcome = match direction {
      Direction::Increase => self
        .store
        .increase_stock(id, amount)
        .await
        .map_err(store_failure("increase_stock"))?,
      Direction::Decrease => self
        .store
        .decrease_stock(id, amount)
        .await
        .map_err(store_failure("decrease_stock"))?,
    };

    match outcome {
      StockAdjustment::Applied(item) => {
        tracing::info!(
          %id,
          amount,
          ?direction,
          quantity = item.quantity,
          "adjusted stock"
        );
        Ok(item.into())
      }
      StockAdjustment::NotFound => Err(Error::ItemNotFound(id)),
      StockAdjustment::Rejected { available } => {
        tracing::warn!(%id, amount, available, ?direction, "stock adjustment rejected");
        Err(match direction {
          Direction::Decrease => Error::InsufficientStock {
            id,
            available,
            requested: amount,
          },
          Direction::Increase => Error::StockLimitExceeded {
            id,
            available,
            requested: amount,
          },
        })
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal_macros::dec;

  use super::*;
  use crate::{
    item::{InventoryItem, ItemFields},
    query::{ItemPage, ItemQuery},
  };

  /// A store that must never be reached.
  struct UnreachableStore;

  impl ItemStore for UnreachableStore {
    type Error = std::io::Error;

    async fn create_item(&self, _: ItemFields) -> Result<InventoryItem, Self::Error> {
      unreachable!("create_item called")
    }

    async fn get_item(&self, _: ItemId) -> Result<Option<InventoryItem>, Self::Error> {
      unreachable!("get_item called")
    }

    async fn update_item(
      &self,
      _: ItemId,
      _: ItemFields,
    ) -> Result<Option<InventoryItem>, Self::Error> {
      unreachable!("update_item called")
    }

    async fn delete_item(&self, _: ItemId) -> Result<bool, Self::Error> {
      unreachable!("delete_item called")
    }

    async fn list_items(&self, _: &ItemQuery) -> Result<ItemPage, Self::Error> {
      unreachable!("list_items called")
    }

    async fn low_stock_items(&self) -> Result<Vec<InventoryItem>, Self::Error> {
      unreachable!("low_stock_items called")
    }

    async fn summary(&self) -> Result<InventorySummary, Self::Error> {
      unreachable!("summary called")
    }

    async fn increase_stock(
      &self,
      _: ItemId,
      _: i64,
    ) -> Result<StockAdjustment, Self::Error> {
      unreachable!("increase_stock called")
    }

    async fn decrease_stock(
      &self,
      _: ItemId,
      _: i64,
    ) -> Result<StockAdjustment, Self::Error> {
      unreachable!("decrease_stock called")
    }
  }

  fn input(quantity: i64, price: rust_decimal::Decimal) -> ItemInput {
    ItemInput {
      name: "Lime".into(),
      category: "Produce".into(),
      quantity,
      min_stock: 5,
      unit: "pcs".into(),
      retail_price: price,
      status: "active".into(),
      image: None,
    }
  }

  #[tokio::test]
  async fn invalid_create_never_reaches_the_store() {
    let svc = InventoryService::new(UnreachableStore);

    let err = svc.create_item(input(-1, dec!(1))).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Validation(ValidationError::NegativeQuantity(-1))
    ));

    let err = svc.create_item(input(1, dec!(-5))).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Validation(ValidationError::NegativePrice(_))
    ));
  }

  #[tokio::test]
  async fn non_positive_amounts_never_reach_the_store() {
    let svc = InventoryService::new(UnreachableStore);

    for amount in [0, -7] {
      assert!(matches!(
        svc.increase_stock(1, amount).await,
        Err(Error::Validation(ValidationError::NonPositiveAmount(_)))
      ));
      assert!(matches!(
        svc.decrease_stock(1, amount).await,
        Err(Error::Validation(ValidationError::NonPositiveAmount(_)))
      ));
      assert!(matches!(
        svc.check_availability(1, amount).await,
        Err(Error::Validation(ValidationError::NonPositiveAmount(_)))
      ));
    }
  }

  #[tokio::test]
  async fn invalid_ids_never_reach_the_store() {
    let svc = InventoryService::new(UnreachableStore);
    assert!(matches!(
      svc.get_item(0).await,
      Err(Error::Validation(ValidationError::InvalidId(0)))
    ));
    assert!(matches!(
      svc.delete_item(-2).await,
      Err(Error::Validation(ValidationError::InvalidId(-2)))
    ));
    assert!(matches!(
      svc.update_item(0, input(1, dec!(1))).await,
      Err(Error::Validation(ValidationError::InvalidId(0)))
    ));
  }
}
