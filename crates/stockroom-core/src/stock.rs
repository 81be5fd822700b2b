//! Stock classification and the outcome of guarded quantity updates.

use serde::{Deserialize, Serialize};

use crate::{
  error::ValidationError,
  item::{InventoryItem, MAX_QUANTITY},
};

/// Derived stock level of an item. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockClass {
  OutOfStock,
  LowStock,
  InStock,
}

impl StockClass {
  pub const ALL: [Self; 3] = [Self::OutOfStock, Self::LowStock, Self::InStock];

  /// The one classification rule.
  ///
  /// A quantity of zero is always out of stock, even when `min_stock` is zero.
  pub fn classify(quantity: i64, min_stock: i64) -> Self {
    if quantity <= 0 {
      Self::OutOfStock
    } else if quantity < min_stock {
      Self::LowStock
    } else {
      Self::InStock
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::OutOfStock => "out_of_stock",
      Self::LowStock => "low_stock",
      Self::InStock => "in_stock",
    }
  }

  /// Parse the `stock` filter parameter (`instock`, `lowstock`,
  /// `outofstock`), case-insensitively.
  pub fn from_filter_param(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "outofstock" => Some(Self::OutOfStock),
      "lowstock" => Some(Self::LowStock),
      "instock" => Some(Self::InStock),
      _ => None,
    }
  }
}

/// Check a stock adjustment amount before any store access.
pub fn validate_amount(amount: i64) -> Result<i64, ValidationError> {
  if amount <= 0 {
    return Err(ValidationError::NonPositiveAmount(amount));
  }
  if amount > MAX_QUANTITY {
    return Err(ValidationError::QuantityTooLarge {
      field: "amount",
      got:   amount,
      max:   MAX_QUANTITY,
    });
  }
  Ok(amount)
}

/// Result of a guarded increase/decrease as decided by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StockAdjustment {
  /// The update was applied; carries the item as written.
  Applied(InventoryItem),
  /// No live item with that id.
  NotFound,
  /// The guard rejected the update. `available` is the quantity observed when
  /// the guard was evaluated.
  Rejected { available: i64 },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_quantity_is_out_of_stock_regardless_of_threshold() {
    assert_eq!(StockClass::classify(0, 0), StockClass::OutOfStock);
    assert_eq!(StockClass::classify(0, 10), StockClass::OutOfStock);
  }

  #[test]
  fn below_threshold_is_low_stock() {
    assert_eq!(StockClass::classify(5, 10), StockClass::LowStock);
    assert_eq!(StockClass::classify(1, 2), StockClass::LowStock);
  }

  #[test]
  fn at_or_above_threshold_is_in_stock() {
    assert_eq!(StockClass::classify(10, 10), StockClass::InStock);
    assert_eq!(StockClass::classify(11, 10), StockClass::InStock);
    assert_eq!(StockClass::classify(1, 0), StockClass::InStock);
  }

  #[test]
  fn exactly_one_class_applies() {
    for quantity in 0..=15 {
      for min_stock in 0..=15 {
        let class = StockClass::classify(quantity, min_stock);
        let matching = StockClass::ALL
          .iter()
          .filter(|c| match c {
            StockClass::OutOfStock => quantity == 0,
            StockClass::LowStock => quantity > 0 && quantity < min_stock,
            StockClass::InStock => quantity > 0 && quantity >= min_stock,
          })
          .collect::<Vec<_>>();
        assert_eq!(matching, vec![&class], "q={quantity} min={min_stock}");
      }
    }
  }

  #[test]
  fn filter_param_is_case_insensitive() {
    assert_eq!(
      StockClass::from_filter_param("LowStock"),
      Some(StockClass::LowStock)
    );
    assert_eq!(
      StockClass::from_filter_param("outofstock"),
      Some(StockClass::OutOfStock)
    );
    assert_eq!(StockClass::from_filter_param("plenty"), None);
  }

  #[test]
  fn amount_must_be_positive() {
    assert_eq!(validate_amount(0), Err(ValidationError::NonPositiveAmount(0)));
    assert_eq!(
      validate_amount(-4),
      Err(ValidationError::NonPositiveAmount(-4))
    );
    assert_eq!(validate_amount(3), Ok(3));
  }
}
