//! [`SqliteStore`]: the SQLite implementation of [`ItemStore`].

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use rusqlite::{OptionalExtension as _, TransactionBehavior, types::Value};

use stockroom_core::{
  item::{InventoryItem, ItemFields, ItemId, MAX_QUANTITY},
  query::{ItemPage, ItemQuery},
  stock::StockAdjustment,
  store::{InventorySummary, ItemStore},
};

use crate::{
  Result,
  encode::{ITEM_COLUMNS, RawAdjustment, RawItem, decode_count, encode_dt, encode_price, now},
  filter::{ListSql, STOCK_CLASS_SQL, register_functions},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An inventory store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        // Concurrent writers from other handles wait instead of failing.
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Add `delta` (negative for a decrease) to a live item's quantity, but
  /// only if the result stays within `0..=MAX_QUANTITY`.
  ///
  /// The guard and the write are one `UPDATE`; the follow-up read that
  /// explains a refusal runs in the same immediate transaction.
  ///
  /// If the returned future is dropped before the closure commits (a request
  /// timeout, for example), the transaction is rolled back and a warning is
  /// logged.
  async fn adjust(&self, id: ItemId, delta: i64) -> Result<StockAdjustment> {
    let at = encode_dt(now());
    let caller = CallerGuard::new();
    let abandoned = caller.flag();

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let updated = tx
          .query_row(
            &format!(
              "UPDATE inventory_items
               SET quantity = quantity + ?1, updated_at = ?2
               WHERE id = ?3
                 AND deleted_at IS NULL
                 AND quantity + ?1 BETWEEN 0 AND ?4
               RETURNING {ITEM_COLUMNS}"
            ),
            rusqlite::params![delta, at, id.0, MAX_QUANTITY],
            RawItem::from_row,
          )
          .optional()?;

        let outcome = match updated {
          Some(raw) => RawAdjustment::Applied(raw),
          None => {
            let available: Option<i64> = tx
              .query_row(
                "SELECT quantity FROM inventory_items
                 WHERE id = ?1 AND deleted_at IS NULL",
                rusqlite::params![id.0],
                |r| r.get(0),
              )
              .optional()?;
            match available {
              Some(available) => RawAdjustment::Rejected { available },
              None => RawAdjustment::NotFound,
            }
          }
        };

        if abandoned.load(Ordering::SeqCst) {
          tracing::warn!(%id, delta, "caller went away; rolling back stock change");
          tx.rollback()?;
          return Ok(RawAdjustment::Abandoned);
        }
        tx.commit()?;
        if abandoned.load(Ordering::SeqCst) {
          tracing::warn!(%id, delta, "caller went away after stock change committed");
        }
        Ok(outcome)
      })
      .await?;

    caller.disarm();
    raw.into_adjustment()
  }

  /// Keep the connection busy for `d`, so that later calls queue behind it.
  #[cfg(test)]
  pub(crate) async fn hold_connection(&self, d: std::time::Duration) -> Result<()> {
    self
      .conn
      .call(move |_| {
        std::thread::sleep(d);
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Raises a shared flag when dropped, unless disarmed first.
///
/// Lives in the async caller; the connection thread checks the flag before
/// committing.
struct CallerGuard {
  flag:  Arc<AtomicBool>,
  armed: bool,
}

impl CallerGuard {
  fn new() -> Self { Self { flag: Arc::new(AtomicBool::new(false)), armed: true } }

  fn flag(&self) -> Arc<AtomicBool> { Arc::clone(&self.flag) }

  fn disarm(mut self) { self.armed = false; }
}

impl Drop for CallerGuard {
  fn drop(&mut self) {
    if self.armed {
      self.flag.store(true, Ordering::SeqCst);
    }
  }
}

// ─── ItemStore impl ──────────────────────────────────────────────────────────

impl ItemStore for SqliteStore {
  type Error = crate::Error;

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  async fn create_item(&self, fields: ItemFields) -> Result<InventoryItem> {
    let cents  = encode_price(fields.retail_price)?;
    let at_str = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        let raw = conn.query_row(
          &format!(
            "INSERT INTO inventory_items
               (name, category, quantity, min_stock, unit, retail_price_cents,
                image, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
             RETURNING {ITEM_COLUMNS}"
          ),
          rusqlite::params![
            fields.name,
            fields.category,
            fields.quantity,
            fields.min_stock,
            fields.unit,
            cents,
            fields.image,
            fields.status.as_str(),
            at_str,
          ],
          RawItem::from_row,
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_item()
  }

  async fn get_item(&self, id: ItemId) -> Result<Option<InventoryItem>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ITEM_COLUMNS} FROM inventory_items
                 WHERE id = ?1 AND deleted_at IS NULL"
              ),
              rusqlite::params![id.0],
              RawItem::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawItem::into_item).transpose()
  }

  async fn update_item(
    &self,
    id:     ItemId,
    fields: ItemFields,
  ) -> Result<Option<InventoryItem>> {
    let cents  = encode_price(fields.retail_price)?;
    let at_str = encode_dt(now());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE inventory_items
                 SET name = ?1, category = ?2, quantity = ?3, min_stock = ?4,
                     unit = ?5, retail_price_cents = ?6, image = ?7,
                     status = ?8, updated_at = ?9
                 WHERE id = ?10 AND deleted_at IS NULL
                 RETURNING {ITEM_COLUMNS}"
              ),
              rusqlite::params![
                fields.name,
                fields.category,
                fields.quantity,
                fields.min_stock,
                fields.unit,
                cents,
                fields.image,
                fields.status.as_str(),
                at_str,
                id.0,
              ],
              RawItem::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawItem::into_item).transpose()
  }

  async fn delete_item(&self, id: ItemId) -> Result<bool> {
    let at_str = encode_dt(now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE inventory_items SET deleted_at = ?1, updated_at = ?1
           WHERE id = ?2 AND deleted_at IS NULL",
          rusqlite::params![at_str, id.0],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_items(&self, query: &ItemQuery) -> Result<ItemPage> {
    let ListSql { where_clause, order_clause, params } = ListSql::build(query);
    let limit  = i64::from(query.limit);
    let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);

    let (total, raws): (i64, Vec<RawItem>) = self
      .conn
      .call(move |conn| {
        // Count and page read the same snapshot.
        let tx = conn.transaction()?;

        let total: i64 = tx.query_row(
          &format!("SELECT COUNT(*) FROM inventory_items WHERE {where_clause}"),
          rusqlite::params_from_iter(params.iter()),
          |r| r.get(0),
        )?;

        let raws = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items
             WHERE {where_clause}
             ORDER BY {order_clause}
             LIMIT ? OFFSET ?"
          ))?;
          let page_params = params
            .into_iter()
            .chain([Value::Integer(limit), Value::Integer(offset)]);
          stmt
            .query_map(rusqlite::params_from_iter(page_params), RawItem::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.commit()?;
        Ok((total, raws))
      })
      .await?;

    Ok(ItemPage {
      items:       raws
        .into_iter()
        .map(RawItem::into_item)
        .collect::<Result<_>>()?,
      total_items: decode_count(total),
    })
  }

  async fn low_stock_items(&self) -> Result<Vec<InventoryItem>> {
    let raws: Vec<RawItem> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ITEM_COLUMNS} FROM inventory_items
           WHERE deleted_at IS NULL AND quantity < min_stock
           ORDER BY id ASC"
        ))?;
        let rows = stmt
          .query_map([], RawItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawItem::into_item).collect()
  }

  async fn summary(&self) -> Result<InventorySummary> {
    let counts: [i64; 5] = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          &format!(
            "SELECT
               COUNT(*),
               COALESCE(SUM(status = 'active'), 0),
               COALESCE(SUM(status = 'inactive'), 0),
               COALESCE(SUM(({STOCK_CLASS_SQL}) = 'low_stock'), 0),
               COALESCE(SUM(({STOCK_CLASS_SQL}) = 'out_of_stock'), 0)
             FROM inventory_items
             WHERE deleted_at IS NULL"
          ),
          [],
          |r| Ok([r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?, r.get(4)?]),
        )?)
      })
      .await?;

    let [total, active, inactive, low, out] = counts.map(decode_count);
    Ok(InventorySummary {
      total_products:        total,
      active_products:       active,
      inactive_products:     inactive,
      low_stock_products:    low,
      out_of_stock_products: out,
    })
  }

  // ── Guarded stock updates ─────────────────────────────────────────────────

  async fn increase_stock(&self, id: ItemId, amount: i64) -> Result<StockAdjustment> {
    self.adjust(id, amount).await
  }

  async fn decrease_stock(&self, id: ItemId, amount: i64) -> Result<StockAdjustment> {
    self.adjust(id, amount.saturating_neg()).await
  }
}
