//! Polled and keyed queries.
//!
//! A query keeps the last good value. A failed fetch leaves that value in
//! place and records the error until the next success.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::observability::metrics;
use crate::stats::client::StatsResult;

struct QueryState<T> {
    value: ArcSwapOption<T>,
    fetching: AtomicBool,
    last_error: ArcSwapOption<String>,
    refetch: Notify,
    version: watch::Sender<u64>,
}

/// Shared view of one query: last value, flags, refetch trigger.
pub struct QueryHandle<T> {
    name: &'static str,
    state: Arc<QueryState<T>>,
}

impl<T> Clone for QueryHandle<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: self.state.clone(),
        }
    }
}

impl<T> QueryHandle<T> {
    fn new(name: &'static str) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            name,
            state: Arc::new(QueryState {
                value: ArcSwapOption::empty(),
                fetching: AtomicBool::new(false),
                last_error: ArcSwapOption::empty(),
                refetch: Notify::new(),
                version,
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last successfully fetched value.
    pub fn latest(&self) -> Option<Arc<T>> {
        self.state.value.load_full()
    }

    /// A fetch is in progress.
    pub fn is_fetching(&self) -> bool {
        self.state.fetching.load(Ordering::SeqCst)
    }

    /// No value yet and a fetch is in progress.
    pub fn is_loading(&self) -> bool {
        self.state.value.load().is_none() && self.is_fetching()
    }

    /// Error of the most recent fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<Arc<String>> {
        self.state.last_error.load_full()
    }

    /// Ask the polling task for an immediate fetch.
    pub fn refetch(&self) {
        self.state.refetch.notify_one();
    }

    /// Receiver bumped after every completed fetch, success or not.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.state.version.subscribe()
    }

    fn clear(&self) {
        self.state.value.store(None);
        self.state.last_error.store(None);
    }

    async fn record<Fut>(&self, fetch: Fut)
    where
        Fut: Future<Output = StatsResult<T>>,
    {
        self.state.fetching.store(true, Ordering::SeqCst);

        match fetch.await {
            Ok(value) => {
                self.state.value.store(Some(Arc::new(value)));
                self.state.last_error.store(None);
                metrics::record_poll(self.name, true);
                tracing::debug!(query = self.name, "Poll succeeded");
            }
            Err(e) => {
                tracing::warn!(query = self.name, error = %e, "Poll failed, keeping previous snapshot");
                self.state.last_error.store(Some(Arc::new(e.to_string())));
                metrics::record_poll(self.name, false);
            }
        }

        self.state.fetching.store(false, Ordering::SeqCst);
        self.state.version.send_modify(|v| *v += 1);
    }
}

/// Fetch immediately, then every `every`, until shutdown.
pub fn spawn_polling<T, F, Fut>(
    name: &'static str,
    every: Duration,
    fetch: F,
    mut shutdown: broadcast::Receiver<()>,
) -> (QueryHandle<T>, JoinHandle<()>)
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = StatsResult<T>> + Send + 'static,
{
    let handle = QueryHandle::new(name);
    let query = handle.clone();

    let task = tokio::spawn(async move {
        tracing::info!(query = name, interval_secs = every.as_secs(), "Polling started");

        let mut ticker = time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => query.record(fetch()).await,
                _ = query.state.refetch.notified() => query.record(fetch()).await,
                _ = shutdown.recv() => {
                    tracing::debug!(query = name, "Polling stopped");
                    break;
                }
            }
        }
    });

    (handle, task)
}

/// A value tagged with the key it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    pub key: String,
    pub value: T,
}

/// A query that fetches on demand for the current key.
///
/// An empty key skips fetching entirely.
pub struct KeyedQuery<T> {
    handle: QueryHandle<Keyed<T>>,
    key: Arc<watch::Sender<String>>,
}

impl<T> Clone for KeyedQuery<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            key: self.key.clone(),
        }
    }
}

impl<T> KeyedQuery<T> {
    /// Switch to `key`. A change clears the value and fetches anew.
    pub fn set_key(&self, key: &str) {
        self.key.send_if_modified(|current| {
            if current == key {
                false
            } else {
                *current = key.to_string();
                true
            }
        });
    }

    pub fn key(&self) -> String {
        self.key.borrow().clone()
    }

    /// Last value, whichever key it belongs to.
    pub fn latest(&self) -> Option<Arc<Keyed<T>>> {
        self.handle.latest()
    }

    /// Last value if it was fetched for `key`.
    pub fn latest_for(&self, key: &str) -> Option<Arc<Keyed<T>>> {
        self.handle.latest().filter(|v| v.key == key)
    }

    pub fn handle(&self) -> &QueryHandle<Keyed<T>> {
        &self.handle
    }

    pub fn refetch(&self) {
        self.handle.refetch();
    }

    pub fn is_loading(&self) -> bool {
        self.handle.is_loading()
    }

    pub fn is_fetching(&self) -> bool {
        self.handle.is_fetching()
    }

    /// Wait until a value for `key` is available or `wait` elapses.
    pub async fn wait_for(&self, key: &str, wait: Duration) -> Option<Arc<Keyed<T>>> {
        let mut updates = self.handle.subscribe();
        let waiting = async {
            loop {
                if let Some(value) = self.latest_for(key) {
                    return Some(value);
                }
                if updates.changed().await.is_err() {
                    return None;
                }
            }
        };
        time::timeout(wait, waiting).await.ok().flatten()
    }
}

/// Fetch for the initial key (unless empty), then on key change or refetch.
pub fn spawn_keyed<T, F, Fut>(
    name: &'static str,
    initial_key: &str,
    fetch: F,
    mut shutdown: broadcast::Receiver<()>,
) -> (KeyedQuery<T>, JoinHandle<()>)
where
    T: Send + Sync + 'static,
    F: Fn(String) -> Fut + Send + 'static,
    Fut: Future<Output = StatsResult<T>> + Send + 'static,
{
    let (key_tx, mut key_rx) = watch::channel(initial_key.to_string());
    let query = KeyedQuery {
        handle: QueryHandle::new(name),
        key: Arc::new(key_tx),
    };
    let handle = query.handle.clone();

    let run = move |key: String| {
        let pending = fetch(key.clone());
        async move { pending.await.map(|value| Keyed { key, value }) }
    };

    let task = tokio::spawn(async move {
        let initial = key_rx.borrow_and_update().clone();
        if initial.is_empty() {
            tracing::debug!(query = name, "Empty key, skipping fetch");
        } else {
            handle.record(run(initial)).await;
        }

        loop {
            tokio::select! {
                changed = key_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let key = key_rx.borrow_and_update().clone();
                    handle.clear();
                    if key.is_empty() {
                        tracing::debug!(query = name, "Empty key, skipping fetch");
                        continue;
                    }
                    handle.record(run(key)).await;
                }
                _ = handle.state.refetch.notified() => {
                    let key = key_rx.borrow().clone();
                    if key.is_empty() {
                        tracing::debug!(query = name, "Empty key, skipping refetch");
                        continue;
                    }
                    handle.record(run(key)).await;
                }
                _ = shutdown.recv() => {
                    tracing::debug!(query = name, "Keyed query stopped");
                    break;
                }
            }
        }
    });

    (query, task)
}
