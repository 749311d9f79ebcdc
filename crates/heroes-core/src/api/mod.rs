//! Remote catalog access.
//!
//! `CatalogSource` is the seam between the repository and wherever the
//! initial hero dataset comes from. `ApiClient` fetches it over HTTP from
//! the public superhero API; `StaticSource` serves a fixed list for offline
//! use and tests.
//!
//! The dataset is a single read-only JSON array with no paging or filters.

pub mod client;
pub mod error;
pub mod source;

pub use client::{ApiClient, DEFAULT_API_BASE_URL};
pub use error::ApiError;
pub use source::{CatalogSource, StaticSource};
