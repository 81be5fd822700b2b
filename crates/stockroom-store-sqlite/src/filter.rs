//! Translation of an [`ItemQuery`] into a SQL `WHERE`/`ORDER BY` pair plus
//! bound parameters.
//!
//! Caller-supplied values only ever travel as parameters. Column names in
//! `ORDER BY` come from the closed [`SortField`] enum.

use rusqlite::{functions::FunctionFlags, types::Value};
use rust_decimal::{Decimal, prelude::ToPrimitive as _};
use stockroom_core::query::{ItemQuery, SortDirection, SortField};

/// SQL rendering of `StockClass::classify`. Yields the same labels as
/// `StockClass::as_str`.
pub const STOCK_CLASS_SQL: &str = "CASE \
   WHEN quantity <= 0 THEN 'out_of_stock' \
   WHEN quantity < min_stock THEN 'low_stock' \
   ELSE 'in_stock' END";

/// Register `unicode_lower`, which folds text with `str::to_lowercase`.
///
/// SQLite's built-in `LOWER` only folds ASCII, while filter terms are folded
/// in Rust; both sides of a comparison must use the same folding.
pub fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "unicode_lower",
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
  )
}

/// Escape `LIKE` wildcards so a search term matches literally. Pair with
/// `ESCAPE '\'`.
pub fn escape_like(term: &str) -> String {
  let mut out = String::with_capacity(term.len());
  for c in term.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

fn sort_column(field: SortField) -> &'static str {
  match field {
    SortField::Name => "name",
    SortField::Quantity => "quantity",
    SortField::RetailPrice => "retail_price_cents",
    SortField::CreatedAt => "created_at",
    SortField::Category => "category",
    SortField::Status => "status",
  }
}

fn sort_keyword(dir: SortDirection) -> &'static str {
  match dir {
    SortDirection::Asc => "ASC",
    SortDirection::Desc => "DESC",
  }
}

/// Convert a price bound to cents. Lower bounds round up and upper bounds
/// round down, so a bound between two cent values keeps its meaning.
fn price_bound_cents(price: Decimal, lower: bool) -> i64 {
  price
    .checked_mul(Decimal::ONE_HUNDRED)
    .map(|c| if lower { c.ceil() } else { c.floor() })
    .and_then(|c| c.to_i64())
    .unwrap_or(i64::MAX)
}

/// `WHERE` and `ORDER BY` bodies for an item listing.
#[derive(Debug)]
pub struct ListSql {
  pub where_clause: String,
  pub order_clause: String,
  pub params:       Vec<Value>,
}

impl ListSql {
  pub fn build(query: &ItemQuery) -> Self {
    let mut conds: Vec<String> = vec!["deleted_at IS NULL".into()];
    let mut params: Vec<Value> = vec![];

    if let Some(term) = &query.search {
      conds.push(r"unicode_lower(name) LIKE ? ESCAPE '\'".into());
      params.push(Value::Text(format!("%{}%", escape_like(term))));
    }
    if let Some(status) = &query.status {
      conds.push("status = ?".into());
      params.push(Value::Text(status.clone()));
    }
    if let Some(category) = &query.category {
      conds.push("unicode_lower(category) = ?".into());
      params.push(Value::Text(category.clone()));
    }
    if let Some(unit) = &query.unit {
      conds.push("unicode_lower(unit) = ?".into());
      params.push(Value::Text(unit.clone()));
    }
    if let Some(class) = query.stock {
      conds.push(format!("({STOCK_CLASS_SQL}) = ?"));
      params.push(Value::Text(class.as_str().to_owned()));
    }
    if let Some(min) = query.min_qty {
      conds.push("quantity >= ?".into());
      params.push(Value::Integer(min));
    }
    if let Some(max) = query.max_qty {
      conds.push("quantity <= ?".into());
      params.push(Value::Integer(max));
    }
    if let Some(min) = query.min_price {
      conds.push("retail_price_cents >= ?".into());
      params.push(Value::Integer(price_bound_cents(min, true)));
    }
    if let Some(max) = query.max_price {
      conds.push("retail_price_cents <= ?".into());
      params.push(Value::Integer(price_bound_cents(max, false)));
    }

    // `id` breaks ties so equal sort keys keep a stable order across pages.
    let dir = sort_keyword(query.sort_dir);
    let order_clause = format!("{} {dir}, id {dir}", sort_column(query.sort_by));

    Self { where_clause: conds.join(" AND "), order_clause, params }
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal_macros::dec;
  use stockroom_core::query::ItemFilter;

  use super::*;

  #[test]
  fn empty_query_only_hides_deleted_rows() {
    let sql = ListSql::build(&ItemQuery::default());
    assert_eq!(sql.where_clause, "deleted_at IS NULL");
    assert_eq!(sql.order_clause, "created_at DESC, id DESC");
    assert!(sql.params.is_empty());
  }

  #[test]
  fn conditions_and_params_line_up() {
    let query = ItemFilter {
      search: Some("50%_off".into()),
      category: Some("Dairy".into()),
      min_price: Some(dec!(1.005)),
      max_price: Some(dec!(2.999)),
      sort_by: Some("retail_price".into()),
      sort_dir: Some("asc".into()),
      ..Default::default()
    }
    .normalize();
    let sql = ListSql::build(&query);

    assert_eq!(sql.where_clause.matches('?').count(), sql.params.len());
    assert_eq!(sql.params, vec![
      Value::Text(r"%50\%\_off%".into()),
      Value::Text("dairy".into()),
      Value::Integer(101),
      Value::Integer(299),
    ]);
    assert_eq!(sql.order_clause, "retail_price_cents ASC, id ASC");
  }

  #[test]
  fn backslash_is_escaped() {
    assert_eq!(escape_like(r"a\b"), r"a\\b");
    assert_eq!(escape_like("plain"), "plain");
  }
}
