//! SQL schema for the Stockroom SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are never physically removed; `deleted_at` marks a soft delete.
CREATE TABLE IF NOT EXISTS inventory_items (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    name               TEXT    NOT NULL CHECK (name <> ''),
    category           TEXT    NOT NULL CHECK (category <> ''),
    quantity           INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    min_stock          INTEGER NOT NULL DEFAULT 5 CHECK (min_stock >= 0),
    unit               TEXT    NOT NULL DEFAULT '',
    retail_price_cents INTEGER NOT NULL DEFAULT 0 CHECK (retail_price_cents >= 0),
    image              TEXT,
    status             TEXT    NOT NULL DEFAULT 'active'
                               CHECK (status IN ('active', 'inactive')),
    created_at         TEXT    NOT NULL,   -- RFC 3339 UTC, microseconds
    updated_at         TEXT    NOT NULL,
    deleted_at         TEXT
);

CREATE INDEX IF NOT EXISTS inventory_items_live_idx
    ON inventory_items(deleted_at, created_at);
CREATE INDEX IF NOT EXISTS inventory_items_name_idx
    ON inventory_items(name);

PRAGMA user_version = 1;
";
