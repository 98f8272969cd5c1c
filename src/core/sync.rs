//! Startup sync between the remote menu and the local store
//!
//! `start()` walks `Uninitialized → SchemaReady → (CacheHit | CacheMiss) →
//! Ready`. A populated store is served as-is; an empty one is filled from
//! the remote source. The loading flag is cleared on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::error::MenuError;
use crate::core::menu::{Category, MenuItem};
use crate::core::remote::MenuSource;
use crate::core::store::MenuStore;

/// Where the sync state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Uninitialized,
    SchemaReady,
    CacheHit,
    CacheMiss,
    Ready,
}

/// Where the items of a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOrigin {
    Cache,
    Remote,
}

/// Process-wide sync flags, in memory only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncState {
    /// True until a load attempt has finished, successfully or not
    pub loading: bool,
    /// True once the local store is known to hold a menu
    pub populated: bool,
    pub phase: SyncPhase,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            loading: true,
            populated: false,
            phase: SyncPhase::Uninitialized,
        }
    }
}

/// Result of a successful sync: what the menu screen should show
#[derive(Debug, Clone)]
pub struct MenuSnapshot {
    pub categories: Vec<Category>,
    pub items: Vec<MenuItem>,
    pub origin: MenuOrigin,
}

/// Decides cache-vs-fetch and keeps the local store populated
pub struct SyncManager {
    store: Arc<MenuStore>,
    source: Box<dyn MenuSource>,
    state: Mutex<SyncState>,
    displayed: Mutex<Vec<MenuItem>>,
    in_flight: AtomicBool,
}

impl SyncManager {
    pub fn new(store: Arc<MenuStore>, source: Box<dyn MenuSource>) -> Self {
        Self {
            store,
            source,
            state: Mutex::new(SyncState::default()),
            displayed: Mutex::new(Vec::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &Arc<MenuStore> {
        &self.store
    }

    /// Current flags and phase
    pub fn state(&self) -> SyncState {
        *lock(&self.state)
    }

    /// Items most recently handed to the front end, including the
    /// optimistic payload of a fetch whose insert later failed
    pub fn displayed_items(&self) -> Vec<MenuItem> {
        lock(&self.displayed).clone()
    }

    /// Load the menu: from the local store when it has rows, otherwise from
    /// the remote source (which then populates the store).
    pub fn start(&self) -> Result<MenuSnapshot, MenuError> {
        let _flight = InFlight::acquire(self)?;

        self.store.ensure_schema()?;
        self.set_phase(SyncPhase::SchemaReady);

        let cached = self.store.select_all()?;
        if !cached.is_empty() {
            self.set_phase(SyncPhase::CacheHit);
            tracing::info!(items = cached.len(), "serving menu from local store");

            self.set_displayed(cached.clone());
            let categories = self.load_categories();
            self.finish(true);
            let categories = categories?;

            return Ok(MenuSnapshot {
                categories,
                items: cached,
                origin: MenuOrigin::Cache,
            });
        }

        self.set_phase(SyncPhase::CacheMiss);
        tracing::info!(origin = self.source.origin(), "local store empty, fetching menu");
        self.fetch_into_store(false)
    }

    /// Fetch unconditionally and replace the stored menu.
    ///
    /// Recovery path for a stale cache or a failed insert.
    pub fn resync(&self) -> Result<MenuSnapshot, MenuError> {
        let _flight = InFlight::acquire(self)?;

        self.store.ensure_schema()?;
        self.set_phase(SyncPhase::CacheMiss);
        tracing::info!(origin = self.source.origin(), "forced menu resync");
        self.fetch_into_store(true)
    }

    fn fetch_into_store(&self, replace: bool) -> Result<MenuSnapshot, MenuError> {
        let payload = match self.source.fetch_menu() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "menu fetch failed");
                if !replace {
                    self.set_displayed(Vec::new());
                }
                let populated = replace && !self.store.is_empty().unwrap_or(true);
                self.finish(populated);
                return Err(e);
            }
        };

        // Show the fetched menu before it is written
        self.set_displayed(payload.menu.clone());

        let stored = if replace {
            self.store.replace_all(&payload.menu)
        } else {
            self.store.insert_all(&payload.menu)
        };
        if let Err(e) = stored {
            tracing::warn!(error = %e, "storing fetched menu failed");
            let populated = !self.store.is_empty().unwrap_or(true);
            self.finish(populated);
            return Err(e);
        }

        match serde_json::to_vec(&payload) {
            Ok(bytes) => {
                if let Err(e) = self.store.record_sync(self.source.origin(), &bytes) {
                    tracing::warn!(error = %e, "failed to record sync metadata");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to encode payload for hashing"),
        }

        let categories = self.load_categories();
        self.finish(!payload.menu.is_empty());
        let categories = categories?;
        tracing::info!(
            items = payload.menu.len(),
            categories = categories.len(),
            "menu synced from remote"
        );

        Ok(MenuSnapshot {
            categories,
            items: payload.menu,
            origin: MenuOrigin::Remote,
        })
    }

    fn load_categories(&self) -> Result<Vec<Category>, MenuError> {
        Ok(Category::from_labels(self.store.select_distinct_categories()?))
    }

    fn set_phase(&self, phase: SyncPhase) {
        tracing::debug!(?phase, "sync phase");
        lock(&self.state).phase = phase;
    }

    fn set_displayed(&self, items: Vec<MenuItem>) {
        *lock(&self.displayed) = items;
    }

    fn finish(&self, populated: bool) {
        let mut state = lock(&self.state);
        state.phase = SyncPhase::Ready;
        state.populated = populated;
    }
}

/// Marks a sync as running. On drop, including unwinding, `loading` and the
/// in-flight flag are cleared and the phase ends at `Ready`.
struct InFlight<'a> {
    manager: &'a SyncManager,
}

impl<'a> InFlight<'a> {
    fn acquire(manager: &'a SyncManager) -> Result<Self, MenuError> {
        manager
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| MenuError::SyncInFlight)?;
        lock(&manager.state).loading = true;
        Ok(Self { manager })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = lock(&self.manager.state);
        state.loading = false;
        state.phase = SyncPhase::Ready;
        drop(state);
        self.manager.in_flight.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
