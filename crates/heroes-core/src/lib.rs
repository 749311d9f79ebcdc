//! Core library for the hero catalog.
//!
//! The catalog starts from the public superhero dataset, fetched once per
//! session, and layers locally created, edited and deleted heroes on top of
//! it. Everything lives in memory; nothing survives the session.
//!
//! - [`api`]: where the initial dataset comes from
//! - [`models`]: `Hero` and the create/patch inputs
//! - [`repository`]: the session's single source of truth
//! - [`config`]: user configuration and environment overrides

pub mod api;
pub mod config;
pub mod models;
pub mod repository;
pub mod utils;

pub use api::{ApiClient, ApiError, CatalogSource, StaticSource};
pub use config::Config;
pub use models::{Hero, HeroCreate, HeroPatch};
pub use repository::{CatalogEvent, HeroRepository, LoadState, LoadSummary, RepositoryConfig};
