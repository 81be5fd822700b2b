//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that text order equals time order. Prices are
//! stored as integer cents.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use rust_decimal::Decimal;
use stockroom_core::{
  item::{InventoryItem, ItemId, ItemStatus, cents_to_price, price_to_cents},
  stock::StockAdjustment,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ItemStatus ──────────────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<ItemStatus> {
  ItemStatus::parse(s).ok_or_else(|| Error::Decode(format!("unknown status: {s:?}")))
}

// ─── Prices ──────────────────────────────────────────────────────────────────

pub fn encode_price(price: Decimal) -> Result<i64> {
  price_to_cents(price).ok_or_else(|| Error::Encode(format!("price out of range: {price}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawItem::from_row`].
pub const ITEM_COLUMNS: &str = "id, name, category, quantity, min_stock, unit, \
   retail_price_cents, image, status, created_at, updated_at, deleted_at";

/// Raw values read directly from an `inventory_items` row.
pub struct RawItem {
  pub id:                 i64,
  pub name:               String,
  pub category:           String,
  pub quantity:           i64,
  pub min_stock:          i64,
  pub unit:               String,
  pub retail_price_cents: i64,
  pub image:              Option<String>,
  pub status:             String,
  pub created_at:         String,
  pub updated_at:         String,
  pub deleted_at:         Option<String>,
}

impl RawItem {
  /// Read a row selected with [`ITEM_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      name:               row.get(1)?,
      category:           row.get(2)?,
      quantity:           row.get(3)?,
      min_stock:          row.get(4)?,
      unit:               row.get(5)?,
      retail_price_cents: row.get(6)?,
      image:              row.get(7)?,
      status:             row.get(8)?,
      created_at:         row.get(9)?,
      updated_at:         row.get(10)?,
      deleted_at:         row.get(11)?,
    })
  }

  pub fn into_item(self) -> Result<InventoryItem> {
    Ok(InventoryItem {
      id:           ItemId(self.id),
      name:         self.name,
      category:     self.category,
      quantity:     self.quantity,
      min_stock:    self.min_stock,
      unit:         self.unit,
      retail_price: cents_to_price(self.retail_price_cents),
      image:        self.image,
      status:       decode_status(&self.status)?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
      deleted_at:   self.deleted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// A guarded update's outcome before row decoding.
pub enum RawAdjustment {
  Applied(RawItem),
  NotFound,
  Rejected { available: i64 },
  /// Rolled back because the caller stopped waiting.
  Abandoned,
}

impl RawAdjustment {
  pub fn into_adjustment(self) -> Result<StockAdjustment> {
    Ok(match self {
      Self::Applied(raw) => StockAdjustment::Applied(raw.into_item()?),
      Self::NotFound => StockAdjustment::NotFound,
      Self::Rejected { available } => StockAdjustment::Rejected { available },
      Self::Abandoned => return Err(Error::Abandoned),
    })
  }
}

/// Clamp a SQL `COUNT`/`SUM` result into an unsigned count.
pub fn decode_count(n: i64) -> u64 { u64::try_from(n).unwrap_or_default() }

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width() {
    let whole = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    let encoded = encode_dt(whole);
    assert_eq!(encoded, "2024-05-01T09:30:00.000000Z");
    assert_eq!(decode_dt(&encoded).unwrap(), whole);

    let later = now();
    assert_eq!(encode_dt(later).len(), encoded.len());
    assert_eq!(decode_dt(&encode_dt(later)).unwrap(), later);
  }

  #[test]
  fn unknown_status_is_a_decode_error() {
    assert!(matches!(decode_status("archived"), Err(Error::Decode(_))));
    assert_eq!(decode_status("inactive").unwrap(), ItemStatus::Inactive);
  }
}
