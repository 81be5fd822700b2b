//! Filter, sort and pagination parameters for item listings.
//!
//! [`ItemFilter`] is what callers send; [`ItemFilter::normalize`] turns it into
//! an [`ItemQuery`] in which every field is either a usable constraint or
//! absent. Stores only see `ItemQuery`.

use std::{fmt, marker::PhantomData, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};

use crate::{item::InventoryItem, stock::StockClass};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// The allow-listed sort columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
  Name,
  Quantity,
  RetailPrice,
  #[default]
  CreatedAt,
  Category,
  Status,
}

impl SortField {
  /// Anything outside the allow-list falls back to `created_at`.
  pub fn from_param(s: &str) -> Self {
    match s {
      "name" => Self::Name,
      "quantity" => Self::Quantity,
      "retail_price" => Self::RetailPrice,
      "created_at" => Self::CreatedAt,
      "category" => Self::Category,
      "status" => Self::Status,
      _ => Self::CreatedAt,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  Asc,
  #[default]
  Desc,
}

impl SortDirection {
  pub fn from_param(s: &str) -> Self {
    if s.trim().eq_ignore_ascii_case("asc") {
      Self::Asc
    } else {
      Self::Desc
    }
  }
}

// ─── Raw filter ──────────────────────────────────────────────────────────────

/// Listing parameters as supplied by a caller. Every field is optional and
/// unset, empty, or non-positive values mean "no constraint".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemFilter {
  /// Case-insensitive substring of the item name.
  pub search:    Option<String>,
  pub status:    Option<String>,
  pub category:  Option<String>,
  pub unit:      Option<String>,
  /// `instock`, `lowstock` or `outofstock`.
  pub stock:     Option<String>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub min_qty:   Option<i64>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub max_qty:   Option<i64>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub min_price: Option<Decimal>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub max_price: Option<Decimal>,
  pub sort_by:   Option<String>,
  pub sort_dir:  Option<String>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub page:      Option<i64>,
  #[serde(default, deserialize_with = "blank_as_none")]
  pub limit:     Option<i64>,
}

/// Reads an optional number that may arrive as a JSON number or as text.
/// Blank text (`?page=`) counts as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: FromStr,
  T::Err: fmt::Display,
{
  struct BlankAsNone<T>(PhantomData<T>);

  impl<'de, T> de::Visitor<'de> for BlankAsNone<T>
  where
    T: FromStr,
    T::Err: fmt::Display,
  {
    type Value = Option<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
      f.write_str("a number, a numeric string or nothing")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> { Ok(None) }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> { Ok(None) }

    fn visit_some<D2: Deserializer<'de>>(
      self,
      deserializer: D2,
    ) -> Result<Self::Value, D2::Error> {
      deserializer.deserialize_any(self)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
      let v = v.trim();
      if v.is_empty() {
        return Ok(None);
      }
      v.parse().map(Some).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
      self.visit_str(&v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
      self.visit_str(&v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
      self.visit_str(&v.to_string())
    }
  }

  deserializer.deserialize_option(BlankAsNone(PhantomData))
}

fn non_blank(s: Option<String>) -> Option<String> {
  s.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

impl ItemFilter {
  pub fn normalize(self) -> ItemQuery {
    let page = match self.page {
      Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
      _ => DEFAULT_PAGE,
    };
    let limit = match self.limit {
      Some(l) if l >= 1 => u32::try_from(l).unwrap_or(MAX_LIMIT).min(MAX_LIMIT),
      _ => DEFAULT_LIMIT,
    };

    ItemQuery {
      search: non_blank(self.search),
      status: non_blank(self.status),
      category: non_blank(self.category),
      unit: non_blank(self.unit),
      stock: self.stock.as_deref().and_then(StockClass::from_filter_param),
      min_qty: self.min_qty.filter(|q| *q > 0),
      max_qty: self.max_qty.filter(|q| *q > 0),
      min_price: self.min_price.filter(|p| *p > Decimal::ZERO),
      max_price: self.max_price.filter(|p| *p > Decimal::ZERO),
      sort_by: self
        .sort_by
        .as_deref()
        .map(SortField::from_param)
        .unwrap_or_default(),
      sort_dir: self
        .sort_dir
        .as_deref()
        .map(SortDirection::from_param)
        .unwrap_or_default(),
      page,
      limit,
    }
  }
}

// ─── Normalised query ────────────────────────────────────────────────────────

/// A listing query in which every constraint is meaningful. Text fields are
/// lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuery {
  pub search:    Option<String>,
  pub status:    Option<String>,
  pub category:  Option<String>,
  pub unit:      Option<String>,
  pub stock:     Option<StockClass>,
  pub min_qty:   Option<i64>,
  pub max_qty:   Option<i64>,
  pub min_price: Option<Decimal>,
  pub max_price: Option<Decimal>,
  pub sort_by:   SortField,
  pub sort_dir:  SortDirection,
  /// 1-based.
  pub page:      u32,
  pub limit:     u32,
}

impl Default for ItemQuery {
  fn default() -> Self { ItemFilter::default().normalize() }
}

impl ItemQuery {
  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.limit)
  }
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// One page of matching items plus the number of matches overall.
#[derive(Debug, Clone)]
pub struct ItemPage {
  pub items:       Vec<InventoryItem>,
  pub total_items: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
  pub page:        u32,
  pub limit:       u32,
  pub total_pages: u64,
  pub total_items: u64,
}

impl Pagination {
  /// An empty result still reports one page.
  pub fn new(page: u32, limit: u32, total_items: u64) -> Self {
    let total_pages = total_items.div_ceil(u64::from(limit.max(1))).max(1);
    Self { page, limit, total_pages, total_items }
  }
}
