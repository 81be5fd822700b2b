//! HTTP application for Stockroom.
//!
//! Loads [`ServerConfig`] and assembles the top-level axum [`Router`]: the
//! JSON API from `stockroom-api` nested under `/api/v1`, a health probe, and
//! the tracing and timeout middleware.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::{Json, Router, routing::get};
use serde::Deserialize;
use serde_json::{Value, json};
use stockroom_core::{InventoryService, store::ItemStore};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("stockroom.db") }
fn default_request_timeout_secs() -> u64 { 30 }

/// Runtime server configuration, deserialised from `config.toml` and
/// `STOCKROOM_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  /// SQLite database file. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 default_host(),
      port:                 default_port(),
      store_path:           default_store_path(),
      request_timeout_secs: default_request_timeout_secs(),
    }
  }
}

impl ServerConfig {
  /// Read `path` if it exists, then let `STOCKROOM_*` variables override it.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("STOCKROOM"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

/// Build the full application router for `service`.
pub fn app<S>(service: Arc<InventoryService<S>>, config: &ServerConfig) -> Router
where
  S: ItemStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api/v1", stockroom_api::api_router(service))
    .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
