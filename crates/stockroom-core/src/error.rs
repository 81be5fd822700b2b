//! Error types for `stockroom-core`.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::item::ItemId;

/// A caller-supplied value violates a precondition. Always raised before the
/// store is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("name must not be empty")]
  EmptyName,

  #[error("category must not be empty")]
  EmptyCategory,

  #[error("quantity must not be negative (got {0})")]
  NegativeQuantity(i64),

  #[error("min_stock must not be negative (got {0})")]
  NegativeMinStock(i64),

  #[error("{field} must not exceed {max} (got {got})")]
  QuantityTooLarge {
    field: &'static str,
    got:   i64,
    max:   i64,
  },

  #[error("retail_price must not be negative (got {0})")]
  NegativePrice(Decimal),

  #[error("retail_price must not exceed {max} (got {got})")]
  PriceTooLarge { got: Decimal, max: Decimal },

  #[error("status must be `active` or `inactive` (got {0:?})")]
  InvalidStatus(String),

  #[error("amount must be greater than zero (got {0})")]
  NonPositiveAmount(i64),

  #[error("item id must be positive (got {0})")]
  InvalidId(i64),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  #[error("inventory item not found: {0}")]
  ItemNotFound(ItemId),

  #[error(
    "insufficient stock for item {id}: available {available}, requested {requested}"
  )]
  InsufficientStock {
    id:        ItemId,
    available: i64,
    requested: i64,
  },

  #[error(
    "stock limit exceeded for item {id}: available {available}, requested {requested}"
  )]
  StockLimitExceeded {
    id:        ItemId,
    available: i64,
    requested: i64,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
