use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use crate::api::CatalogSource;
use crate::models::Hero;

/// Progress of the one-shot remote load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    /// Terminal. Reached whether the fetch succeeded or not.
    Loaded,
}

/// What the one-shot load produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Heroes contributed by the remote dataset after dropping duplicate ids
    pub remote_count: usize,
    /// Why the remote partition is empty, if the fetch failed
    pub error: Option<String>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadSummary {
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FetchOutcome {
    pub heroes: Vec<Hero>,
    pub error: Option<String>,
}

/// A fetch that runs at most once no matter how many callers await it, or
/// how many of them are dropped before it finishes.
pub(crate) type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

pub(crate) fn one_shot_fetch(
    source: Arc<dyn CatalogSource>,
    timeout: Option<Duration>,
) -> SharedFetch {
    async move {
        debug!(?timeout, "Starting remote catalog load");

        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, source.fetch_all())
                .await
                .unwrap_or_else(|_| {
                    Err(anyhow!("Catalog load timed out after {}ms", limit.as_millis()))
                }),
            None => source.fetch_all().await,
        };

        match result {
            Ok(heroes) => FetchOutcome {
                heroes: dedupe_by_id(heroes),
                error: None,
            },
            Err(e) => {
                let error = format!("{:#}", e);
                warn!(
                    error = %error,
                    "Remote catalog load failed, continuing with an empty catalog"
                );
                FetchOutcome {
                    heroes: Vec::new(),
                    error: Some(error),
                }
            }
        }
    }
    .boxed()
    .shared()
}

/// Keep the first hero for each id
fn dedupe_by_id(heroes: Vec<Hero>) -> Vec<Hero> {
    let mut seen = HashSet::with_capacity(heroes.len());
    heroes
        .into_iter()
        .filter(|hero| {
            let first = seen.insert(hero.id);
            if !first {
                warn!(
                    id = hero.id,
                    name = %hero.name,
                    "Dropping duplicate hero id from remote catalog"
                );
            }
            first
        })
        .collect()
}
