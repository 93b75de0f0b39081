//! Remote collection store: fetch lifecycle keyed by a dependency key
//!
//! A store owns the last successfully loaded value, a loading flag and the last
//! error. Every load is issued a generation ticket; a completion whose
//! generation is no longer current (a newer load started, the key changed, or
//! the store was closed) is discarded as [`LoadOutcome::Stale`]. On failure the
//! previous value is kept.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, SiteworkError};

/// Injected fetch function
pub type Fetcher<K, V> = Arc<dyn Fn(K) -> BoxFuture<'static, Result<V>> + Send + Sync>;

/// Identifies one issued load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket<K> {
    pub generation: u64,
    pub key: K,
}

/// What happened to a completed load
#[derive(Debug)]
pub enum LoadOutcome {
    /// Value replaced, error cleared
    Applied,
    /// Previous value kept, error recorded
    Failed(SiteworkError),
    /// Superseded or closed; nothing changed
    Stale,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied)
    }
}

/// Point-in-time copy of a store's state
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<K, V> {
    pub key: K,
    pub value: V,
    pub is_loading: bool,
    pub error: Option<String>,
    pub generation: u64,
    /// At least one load has been applied
    pub loaded: bool,
}

#[derive(Debug)]
struct StoreState<K, V> {
    key: K,
    value: V,
    is_loading: bool,
    error: Option<String>,
    generation: u64,
    loaded: bool,
    closed: bool,
}

/// Store for a remotely loaded value of type `V`, refetched per key `K`.
pub struct RemoteStore<K, V> {
    label: &'static str,
    fetcher: Fetcher<K, V>,
    state: Mutex<StoreState<K, V>>,
}

impl<K, V> RemoteStore<K, V>
where
    K: Clone + PartialEq + std::fmt::Debug + Send + 'static,
    V: Clone + Default + Send + 'static,
{
    pub fn new<F, Fut>(label: &'static str, key: K, fetch: F) -> Self
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        Self::from_fetcher(label, key, Arc::new(move |k| fetch(k).boxed()))
    }

    pub fn from_fetcher(label: &'static str, key: K, fetcher: Fetcher<K, V>) -> Self {
        Self {
            label,
            fetcher,
            state: Mutex::new(StoreState {
                key,
                value: V::default(),
                is_loading: false,
                error: None,
                generation: 0,
                loaded: false,
                closed: false,
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn snapshot(&self) -> Snapshot<K, V> {
        let state = self.state.lock();
        Snapshot {
            key: state.key.clone(),
            value: state.value.clone(),
            is_loading: state.is_loading,
            error: state.error.clone(),
            generation: state.generation,
            loaded: state.loaded,
        }
    }

    pub fn value(&self) -> V {
        self.state.lock().value.clone()
    }

    pub fn key(&self) -> K {
        self.state.lock().key.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Change the dependency key. Returns whether it changed; a change
    /// invalidates any load in flight for the old key.
    pub fn set_key(&self, key: K) -> bool {
        let mut state = self.state.lock();
        if state.key == key {
            return false;
        }
        debug!(store = self.label, ?key, "dependency key changed");
        state.key = key;
        state.generation += 1;
        state.is_loading = false;
        true
    }

    /// Start a load: bump the generation and raise the loading flag. A closed
    /// store never raises the flag; its completions are all stale.
    pub fn begin(&self) -> LoadTicket<K> {
        let mut state = self.state.lock();
        state.generation += 1;
        state.is_loading = !state.closed;
        debug!(store = self.label, generation = state.generation, key = ?state.key, "load started");
        LoadTicket {
            generation: state.generation,
            key: state.key.clone(),
        }
    }

    /// Apply the result of the load identified by `ticket`.
    pub fn complete(&self, ticket: &LoadTicket<K>, result: Result<V>) -> LoadOutcome {
        let mut state = self.state.lock();
        if state.closed || ticket.generation != state.generation {
            debug!(
                store = self.label,
                generation = ticket.generation,
                current = state.generation,
                "discarding stale load"
            );
            return LoadOutcome::Stale;
        }

        state.is_loading = false;
        match result {
            Ok(value) => {
                state.value = value;
                state.error = None;
                state.loaded = true;
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!(store = self.label, error = %err, "load failed");
                state.error = Some(err.to_string());
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Fetch with the current key and apply the result.
    pub async fn load(&self) -> LoadOutcome {
        let ticket = self.begin();
        let result = (self.fetcher)(ticket.key.clone()).await;
        self.complete(&ticket, result)
    }

    pub async fn refresh(&self) -> LoadOutcome {
        self.load().await
    }

    /// Set the key and load when it changed or nothing was loaded yet.
    pub async fn load_key(&self, key: K) -> Option<LoadOutcome> {
        let changed = self.set_key(key);
        let loaded = self.state.lock().loaded;
        if changed || !loaded {
            Some(self.load().await)
        } else {
            None
        }
    }

    /// Detach the store. Loads completing afterwards are discarded.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.is_loading = false;
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}
