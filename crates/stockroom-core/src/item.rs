//! Inventory items: the stock-keeping units tracked by Stockroom.
//!
//! Input arrives as an [`ItemInput`] and must pass [`ItemInput::validate`]
//! before it can reach a store; stores only ever accept [`ItemFields`].

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive as _};
use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, stock::StockClass};

// ─── Limits ──────────────────────────────────────────────────────────────────

/// Upper bound for `quantity`, `min_stock` and stock adjustment amounts.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// Upper bound for `retail_price`, in cents (`decimal(10,2)`).
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;

/// Threshold applied when an input omits `min_stock`.
pub const DEFAULT_MIN_STOCK: i64 = 5;

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned identifier of an inventory item.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl ItemId {
  /// Reject ids that can never have been assigned by a store.
  pub fn checked(raw: i64) -> Result<Self, ValidationError> {
    if raw <= 0 {
      return Err(ValidationError::InvalidId(raw));
    }
    Ok(Self(raw))
  }
}

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Whether an item is offered for sale. Unrelated to how much of it is on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
  Active,
  Inactive,
}

impl ItemStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Inactive => "inactive",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "active" => Some(Self::Active),
      "inactive" => Some(Self::Inactive),
      _ => None,
    }
  }
}

impl fmt::Display for ItemStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Prices ──────────────────────────────────────────────────────────────────

/// Convert a price with at most two fractional digits to whole cents.
pub fn price_to_cents(price: Decimal) -> Option<i64> {
  price
    .round_dp(2)
    .checked_mul(Decimal::ONE_HUNDRED)?
    .to_i64()
}

pub fn cents_to_price(cents: i64) -> Decimal { Decimal::new(cents, 2) }

// ─── Item ────────────────────────────────────────────────────────────────────

/// A persisted inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
  pub id:           ItemId,
  pub name:         String,
  pub category:     String,
  /// On-hand count; never negative.
  pub quantity:     i64,
  /// Threshold below which the item counts as low on stock.
  pub min_stock:    i64,
  pub unit:         String,
  pub retail_price: Decimal,
  pub image:        Option<String>,
  pub status:       ItemStatus,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub deleted_at:   Option<DateTime<Utc>>,
}

impl InventoryItem {
  pub fn stock_class(&self) -> StockClass {
    StockClass::classify(self.quantity, self.min_stock)
  }
}

// ─── Input ───────────────────────────────────────────────────────────────────

fn default_min_stock() -> i64 { DEFAULT_MIN_STOCK }

/// Unvalidated create/update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
  pub name:         String,
  pub category:     String,
  pub quantity:     i64,
  #[serde(default = "default_min_stock")]
  pub min_stock:    i64,
  #[serde(default)]
  pub unit:         String,
  pub retail_price: Decimal,
  pub status:       String,
  #[serde(default)]
  pub image:        Option<String>,
}

/// Validated item fields. The only shape a store accepts for writes.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFields {
  pub name:         String,
  pub category:     String,
  pub quantity:     i64,
  pub min_stock:    i64,
  pub unit:         String,
  /// Rounded to cents.
  pub retail_price: Decimal,
  pub image:        Option<String>,
  pub status:       ItemStatus,
}

fn check_count(field: &'static str, value: i64) -> Result<(), ValidationError> {
  if value > MAX_QUANTITY {
    return Err(ValidationError::QuantityTooLarge {
      field,
      got: value,
      max: MAX_QUANTITY,
    });
  }
  Ok(())
}

impl ItemInput {
  pub fn validate(self) -> Result<ItemFields, ValidationError> {
    let name = self.name.trim();
    if name.is_empty() {
      return Err(ValidationError::EmptyName);
    }
    let category = self.category.trim();
    if category.is_empty() {
      return Err(ValidationError::EmptyCategory);
    }

    if self.quantity < 0 {
      return Err(ValidationError::NegativeQuantity(self.quantity));
    }
    check_count("quantity", self.quantity)?;
    if self.min_stock < 0 {
      return Err(ValidationError::NegativeMinStock(self.min_stock));
    }
    check_count("min_stock", self.min_stock)?;

    if self.retail_price < Decimal::ZERO {
      return Err(ValidationError::NegativePrice(self.retail_price));
    }
    let max_price = cents_to_price(MAX_PRICE_CENTS);
    let retail_price = match price_to_cents(self.retail_price) {
      Some(cents) if cents <= MAX_PRICE_CENTS => cents_to_price(cents),
      _ => {
        return Err(ValidationError::PriceTooLarge {
          got: self.retail_price,
          max: max_price,
        });
      }
    };

    let status = ItemStatus::parse(&self.status)
      .ok_or_else(|| ValidationError::InvalidStatus(self.status.clone()))?;

    let image = self
      .image
      .map(|s| s.trim().to_owned())
      .filter(|s| !s.is_empty());

    Ok(ItemFields {
      name: name.to_owned(),
      category: category.to_owned(),
      quantity: self.quantity,
      min_stock: self.min_stock,
      unit: self.unit.trim().to_owned(),
      retail_price,
      image,
      status,
    })
  }
}

// ─── Response view ───────────────────────────────────────────────────────────

/// An item annotated with its derived stock state, as returned to callers.
///
/// `is_low_stock` is true exactly when `stock_status` is `low_stock`; an empty
/// shelf reports `out_of_stock` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemView {
  #[serde(flatten)]
  pub item:         InventoryItem,
  pub stock_status: StockClass,
  pub is_low_stock: bool,
}

impl From<InventoryItem> for ItemView {
  fn from(item: InventoryItem) -> Self {
    let stock_status = item.stock_class();
    let is_low_stock = stock_status == StockClass::LowStock;
    Self { item, stock_status, is_low_stock }
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal_macros::dec;

  use super::*;

  fn input() -> ItemInput {
    ItemInput {
      name:         "Oat milk".into(),
      category:     "Dairy alternatives".into(),
      quantity:     12,
      min_stock:    DEFAULT_MIN_STOCK,
      unit:         "litre".into(),
      retail_price: dec!(3.50),
      status:       "active".into(),
      image:        None,
    }
  }

  #[test]
  fn valid_input_passes() {
    let fields = input().validate().unwrap();
    assert_eq!(fields.name, "Oat milk");
    assert_eq!(fields.status, ItemStatus::Active);
    assert_eq!(fields.retail_price, dec!(3.50));
  }

  #[test]
  fn negative_quantity_is_rejected() {
    let mut i = input();
    i.quantity = -1;
    assert_eq!(i.validate(), Err(ValidationError::NegativeQuantity(-1)));
  }

  #[test]
  fn negative_price_is_rejected() {
    let mut i = input();
    i.retail_price = dec!(-5);
    assert_eq!(i.validate(), Err(ValidationError::NegativePrice(dec!(-5))));
  }

  #[test]
  fn blank_name_and_category_are_rejected() {
    let mut i = input();
    i.name = "   ".into();
    assert_eq!(i.validate(), Err(ValidationError::EmptyName));

    let mut i = input();
    i.category = String::new();
    assert_eq!(i.validate(), Err(ValidationError::EmptyCategory));
  }

  #[test]
  fn unknown_status_is_rejected() {
    let mut i = input();
    i.status = "archived".into();
    assert_eq!(
      i.validate(),
      Err(ValidationError::InvalidStatus("archived".into()))
    );
  }

  #[test]
  fn negative_min_stock_is_rejected() {
    let mut i = input();
    i.min_stock = -3;
    assert_eq!(i.validate(), Err(ValidationError::NegativeMinStock(-3)));
  }

  #[test]
  fn oversized_values_are_rejected() {
    let mut i = input();
    i.quantity = MAX_QUANTITY + 1;
    assert!(matches!(
      i.validate(),
      Err(ValidationError::QuantityTooLarge { field: "quantity", .. })
    ));

    let mut i = input();
    i.retail_price = dec!(100000000.00);
    assert!(matches!(
      i.validate(),
      Err(ValidationError::PriceTooLarge { .. })
    ));
  }

  #[test]
  fn price_is_rounded_to_cents() {
    let mut i = input();
    i.retail_price = dec!(1.005);
    let fields = i.validate().unwrap();
    assert_eq!(price_to_cents(fields.retail_price), Some(100));
    assert_eq!(fields.retail_price.scale(), 2);
  }

  #[test]
  fn min_stock_defaults_when_omitted() {
    let raw = r#"{
      "name": "Espresso beans",
      "category": "Coffee",
      "quantity": 3,
      "retail_price": 18.9,
      "status": "inactive"
    }"#;
    let parsed: ItemInput = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.min_stock, DEFAULT_MIN_STOCK);
    assert_eq!(parsed.unit, "");
    assert!(parsed.image.is_none());
  }

  #[test]
  fn item_id_must_be_positive() {
    assert_eq!(ItemId::checked(0), Err(ValidationError::InvalidId(0)));
    assert_eq!(ItemId::checked(7), Ok(ItemId(7)));
  }

  fn stored(quantity: i64, min_stock: i64) -> InventoryItem {
    let at = Utc::now();
    InventoryItem {
      id: ItemId(1),
      name: "Oat milk".into(),
      category: "Dairy alternatives".into(),
      quantity,
      min_stock,
      unit: "litre".into(),
      retail_price: dec!(3.50),
      image: None,
      status: ItemStatus::Active,
      created_at: at,
      updated_at: at,
      deleted_at: None,
    }
  }

  #[test]
  fn low_stock_flag_follows_stock_status() {
    for (quantity, min_stock, class, low) in [
      (0, 5, StockClass::OutOfStock, false),
      (0, 0, StockClass::OutOfStock, false),
      (4, 5, StockClass::LowStock, true),
      (5, 5, StockClass::InStock, false),
    ] {
      let view = ItemView::from(stored(quantity, min_stock));
      assert_eq!(view.stock_status, class, "{quantity}/{min_stock}");
      assert_eq!(view.is_low_stock, low, "{quantity}/{min_stock}");
    }
  }
}
