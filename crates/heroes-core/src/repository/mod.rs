//! In-memory hero repository.
//!
//! `HeroRepository` owns the hero collection for the lifetime of a session.
//! The remote dataset is fetched at most once, lazily on the first operation
//! (or eagerly through [`HeroRepository::load`]). A failed or timed-out
//! fetch leaves the catalog empty instead of surfacing an error.
//!
//! Remote and locally created heroes share one ordered list. Once loaded,
//! every hero can be updated or deleted regardless of where it came from.
//! New heroes go to the front of the list.

pub mod hero_repository;
pub mod load;

pub use hero_repository::{CatalogEvent, HeroRepository, RepositoryConfig};
pub use load::{LoadState, LoadSummary};
