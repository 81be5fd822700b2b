//! Core types and trait definitions for the Stockroom inventory service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod error;
pub mod item;
pub mod query;
pub mod service;
pub mod stock;
pub mod store;

pub use error::{Error, Result, ValidationError};
pub use service::InventoryService;
