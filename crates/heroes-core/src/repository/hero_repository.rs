use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, OnceCell, RwLock};
use tracing::{debug, info};

use crate::api::CatalogSource;
use crate::models::{Hero, HeroCreate, HeroPatch};
use crate::utils::contains_ignore_case;

use super::load::{one_shot_fetch, SharedFetch};
use super::{LoadState, LoadSummary};

// ============================================================================
// Constants
// ============================================================================

/// Simulated response time for getAll/getById/search
const DEFAULT_READ_LATENCY_MS: u64 = 300;

/// Simulated response time for create/update/delete
const DEFAULT_WRITE_LATENCY_MS: u64 = 500;

/// Buffered change events per subscriber before it starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Ids handed out when the remote dataset contributed nothing
const FIRST_LOCAL_ID: i64 = 1;

/// Tunables for a repository instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub read_latency: Duration,
    pub write_latency: Duration,
    /// Give up on the remote dataset after this long. Expiry is treated
    /// exactly like a failed fetch.
    pub load_timeout: Option<Duration>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            read_latency: Duration::from_millis(DEFAULT_READ_LATENCY_MS),
            write_latency: Duration::from_millis(DEFAULT_WRITE_LATENCY_MS),
            load_timeout: None,
        }
    }
}

impl RepositoryConfig {
    /// No artificial latency
    pub fn immediate() -> Self {
        Self {
            read_latency: Duration::ZERO,
            write_latency: Duration::ZERO,
            load_timeout: None,
        }
    }
}

/// Change notifications, published after the change is visible to readers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    Loaded { count: usize, degraded: bool },
    Created(i64),
    Updated(i64),
    Deleted(i64),
}

#[derive(Debug, Default)]
struct Catalog {
    heroes: Vec<Hero>,
    /// Next id above everything issued so far, `None` once past `i64::MAX`
    next_id: Option<i64>,
    /// Every id that has ever been in the collection, deleted ones included
    issued: BTreeSet<i64>,
}

impl Catalog {
    fn seed(heroes: Vec<Hero>) -> Self {
        let issued: BTreeSet<i64> = heroes.iter().map(|h| h.id).collect();
        let next_id = match issued.last() {
            Some(max) => max.checked_add(1).map(|id| id.max(FIRST_LOCAL_ID)),
            None => Some(FIRST_LOCAL_ID),
        };
        Self {
            heroes,
            next_id,
            issued,
        }
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.heroes.iter().position(|h| h.id == id)
    }

    fn allocate_id(&mut self) -> i64 {
        let id = match self.next_id {
            Some(id) => {
                self.next_id = id.checked_add(1);
                id
            }
            None => self.unissued_id(),
        };
        self.issued.insert(id);
        id
    }

    /// Fallback once the counter is exhausted: just below the lowest id ever
    /// issued, or failing that the lowest gap.
    fn unissued_id(&self) -> i64 {
        if let Some(id) = self.issued.first().and_then(|min| min.checked_sub(1)) {
            return id;
        }
        // Lowest issued id is i64::MIN here
        let mut candidate = i64::MIN;
        for &id in &self.issued {
            if id != candidate {
                break;
            }
            match candidate.checked_add(1) {
                Some(next) => candidate = next,
                None => break,
            }
        }
        candidate
    }
}

/// Single source of truth for the hero collection of one session.
///
/// Every operation waits for the one-shot remote load before touching the
/// collection, so no caller ever sees a partially loaded catalog. Writes are
/// committed before their simulated latency elapses: once a write resolves,
/// every later read observes it.
pub struct HeroRepository {
    config: RepositoryConfig,
    catalog: RwLock<Catalog>,
    fetch: SharedFetch,
    loaded: OnceCell<LoadSummary>,
    load_started: AtomicBool,
    events: broadcast::Sender<CatalogEvent>,
}

impl HeroRepository {
    pub fn new<S: CatalogSource + 'static>(source: S, config: RepositoryConfig) -> Self {
        Self::from_shared(Arc::new(source), config)
    }

    pub fn from_shared(source: Arc<dyn CatalogSource>, config: RepositoryConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            fetch: one_shot_fetch(source, config.load_timeout),
            config,
            catalog: RwLock::new(Catalog::default()),
            loaded: OnceCell::new(),
            load_started: AtomicBool::new(false),
            events,
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn load_state(&self) -> LoadState {
        if self.loaded.initialized() {
            LoadState::Loaded
        } else if self.load_started.load(Ordering::SeqCst) {
            LoadState::Loading
        } else {
            LoadState::NotLoaded
        }
    }

    /// Outcome of the remote load, once it has happened
    pub fn load_summary(&self) -> Option<LoadSummary> {
        self.loaded.get().cloned()
    }

    /// Listen for changes to the collection. Events published before the
    /// call are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    /// Wait for the remote dataset to be merged into the collection,
    /// starting the fetch if nobody has yet. Safe to call any number of
    /// times; the fetch is only ever issued once.
    pub async fn load(&self) -> &LoadSummary {
        self.loaded.get_or_init(|| self.commit_remote()).await
    }

    async fn commit_remote(&self) -> LoadSummary {
        self.load_started.store(true, Ordering::SeqCst);
        let outcome = self.fetch.clone().await;

        let remote_count = outcome.heroes.len();
        let next_id = {
            let mut catalog = self.catalog.write().await;
            *catalog = Catalog::seed(outcome.heroes);
            catalog.next_id
        };

        let summary = LoadSummary {
            remote_count,
            error: outcome.error,
            loaded_at: Utc::now(),
        };
        info!(
            remote_count,
            degraded = summary.is_degraded(),
            ?next_id,
            "Hero catalog loaded"
        );
        self.notify(CatalogEvent::Loaded {
            count: remote_count,
            degraded: summary.is_degraded(),
        });
        summary
    }

    fn notify(&self, event: CatalogEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn simulate_latency(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Run a read against the loaded collection, then apply read latency
    async fn read<T>(&self, f: impl FnOnce(&[Hero]) -> T) -> T {
        self.load().await;
        let result = {
            let catalog = self.catalog.read().await;
            f(&catalog.heroes)
        };
        Self::simulate_latency(self.config.read_latency).await;
        result
    }

    /// Number of heroes currently in the collection, without read latency
    pub async fn len(&self) -> usize {
        self.load().await;
        self.catalog.read().await.heroes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // ===== Reads =====

    /// Snapshot of the whole collection, newest local heroes first
    pub async fn get_all(&self) -> Vec<Hero> {
        self.read(|heroes| heroes.to_vec()).await
    }

    pub async fn get_by_id(&self, id: i64) -> Option<Hero> {
        self.read(|heroes| heroes.iter().find(|h| h.id == id).cloned())
            .await
    }

    /// Heroes whose name contains `term`, ignoring case.
    /// An empty term matches every hero.
    pub async fn search_by_name(&self, term: &str) -> Vec<Hero> {
        let matches = self
            .read(|heroes| {
                heroes
                    .iter()
                    .filter(|h| contains_ignore_case(&h.name, term))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .await;
        debug!(term, matches = matches.len(), "Searched heroes by name");
        matches
    }

    // ===== Writes =====

    /// Synthesize a full hero from `input` and put it at the front of the
    /// collection.
    pub async fn create(&self, input: HeroCreate) -> Hero {
        self.load().await;
        let hero = {
            let mut catalog = self.catalog.write().await;
            let id = catalog.allocate_id();
            let hero = Hero::from_create(id, input);
            catalog.heroes.insert(0, hero.clone());
            hero
        };

        info!(id = hero.id, name = %hero.name, "Created hero");
        self.notify(CatalogEvent::Created(hero.id));
        Self::simulate_latency(self.config.write_latency).await;
        hero
    }

    /// Merge `patch` into the hero with `id`, keeping its position.
    /// Returns `None` if there is no such hero.
    pub async fn update(&self, id: i64, patch: HeroPatch) -> Option<Hero> {
        self.load().await;
        let updated = {
            let mut catalog = self.catalog.write().await;
            catalog.position(id).map(|index| {
                let hero = &mut catalog.heroes[index];
                hero.apply_patch(patch);
                hero.clone()
            })
        };

        match updated {
            Some(ref hero) => {
                info!(id, name = %hero.name, "Updated hero");
                self.notify(CatalogEvent::Updated(id));
            }
            None => debug!(id, "Update skipped, no such hero"),
        }
        Self::simulate_latency(self.config.write_latency).await;
        updated
    }

    /// Remove the hero with `id`. Returns whether anything was removed.
    pub async fn delete(&self, id: i64) -> bool {
        self.load().await;
        let removed = {
            let mut catalog = self.catalog.write().await;
            catalog
                .position(id)
                .map(|index| catalog.heroes.remove(index))
        };

        let found = removed.is_some();
        if let Some(hero) = removed {
            info!(id, name = %hero.name, "Deleted hero");
            self.notify(CatalogEvent::Deleted(id));
        } else {
            debug!(id, "Delete skipped, no such hero");
        }
        Self::simulate_latency(self.config.write_latency).await;
        found
    }
}

// ============================================================================
// Tests
// ============================================================================
