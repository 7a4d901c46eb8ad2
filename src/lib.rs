//! Daily Folder: date-organized collection hierarchy
//!
//! Maps a calendar date to a `Root / YYYY / YYYY-MM / YYYY-MM-DD` chain of
//! collections, resolves or idempotently creates that chain in a collection
//! store, and drives a lazily-expanding tree view to select the day's folder.

pub mod api;
pub mod config;
pub mod error;
pub mod existing;
pub mod hierarchy;
pub mod logging;
pub mod navigator;
pub mod path;
pub mod session;
pub mod store;
pub mod tooling;
pub mod types;

pub use api::DailyFolderApi;
pub use error::{ApiError, StoreError};
