//! Error type for `stockroom-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A domain value has no column representation.
  #[error("encode error: {0}")]
  Encode(String),

  /// A stored value does not map onto a domain type.
  #[error("decode error: {0}")]
  Decode(String),

  /// A stock change was rolled back because its caller went away.
  #[error("stock change abandoned by caller")]
  Abandoned,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
