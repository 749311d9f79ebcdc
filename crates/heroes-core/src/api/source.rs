use anyhow::Result;
use async_trait::async_trait;

use crate::models::Hero;

/// Where the initial hero dataset comes from.
///
/// Implementations may fail freely; the repository absorbs any error and
/// carries on with an empty remote partition.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full dataset in one go, in the order the source delivers it.
    async fn fetch_all(&self) -> Result<Vec<Hero>>;
}

/// A source backed by a fixed list of heroes.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    heroes: Vec<Hero>,
}

impl StaticSource {
    pub fn new(heroes: Vec<Hero>) -> Self {
        Self { heroes }
    }

    /// A source with nothing in it, used for offline sessions
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch_all(&self) -> Result<Vec<Hero>> {
        Ok(self.heroes.clone())
    }
}

#[async_trait]
impl<S: CatalogSource + ?Sized> CatalogSource for std::sync::Arc<S> {
    async fn fetch_all(&self) -> Result<Vec<Hero>> {
        (**self).fetch_all().await
    }
}

#[async_trait]
impl<S: CatalogSource + ?Sized> CatalogSource for Box<S> {
    async fn fetch_all(&self) -> Result<Vec<Hero>> {
        (**self).fetch_all().await
    }
}
