use chrono::{DateTime, Utc};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

use super::query::{QueryState, QueryStatus};
use super::{InvalidationGraph, QueryKey, TransactionId};
use crate::clients::ApiError;
use crate::domain::events::CacheEvent;

type Data = Arc<dyn Any + Send + Sync>;

/// Whether an entry's value is confirmed by the server or written ahead of
/// a mutation that has not settled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Committed,
    Pending(TransactionId),
}

#[derive(Clone)]
struct Entry {
    data: Option<Data>,
    version: u64,
    updated_at: Option<DateTime<Utc>>,
    stale: bool,
    error: Option<ApiError>,
    fetching: bool,
    generation: u64,
    /// Unsettled transactions with optimistic writes here, oldest first.
    pending: Vec<TransactionId>,
}

impl Entry {
    const fn empty() -> Self {
        Self {
            data: None,
            version: 0,
            updated_at: None,
            stale: false,
            error: None,
            fetching: false,
            generation: 0,
            pending: Vec::new(),
        }
    }

    fn state(&self) -> EntryState {
        self.pending
            .last()
            .map_or(EntryState::Committed, |id| EntryState::Pending(*id))
    }

    /// Any fetch started before this point loses its right to store.
    fn supersede_fetches(&mut self) {
        self.generation += 1;
        self.fetching = false;
    }
}

/// How a transaction's write relates to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Write {
    /// Ahead of the server; undone if the mutation fails.
    Optimistic(TransactionId),
    /// Server-confirmed data written while the transaction settles.
    Confirmed(TransactionId),
}

/// The value of one entry as it was before a transaction first touched it.
#[derive(Clone)]
pub struct Snapshot {
    key: QueryKey,
    data: Option<Data>,
    updated_at: Option<DateTime<Utc>>,
    stale: bool,
    pending: Vec<TransactionId>,
}

impl Snapshot {
    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("key", &self.key)
            .field("has_data", &self.data.is_some())
            .field("pending", &self.pending)
            .finish()
    }
}

/// Handed out by [`QueryCache::begin_fetch`]; a fetch may only store its
/// result while the entry's generation still matches.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    key: QueryKey,
    generation: u64,
}

impl FetchTicket {
    #[must_use]
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }
}

#[derive(Debug)]
pub enum FetchOutcome<T> {
    Stored(T),
    Failed(ApiError),
    /// The entry was cancelled or overwritten while the fetch was in flight.
    Discarded(Result<T, ApiError>),
}

/// Keyed in-memory store for server state.
///
/// Cloning is cheap and every clone shares the same entries, graph and
/// event channel.
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, Entry>>>,
    graph: Arc<InvalidationGraph>,
    events: broadcast::Sender<CacheEvent>,
    versions: Arc<AtomicU64>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("graph", &self.graph)
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}

impl QueryCache {
    #[must_use]
    pub fn new(graph: InvalidationGraph, event_buffer: usize) -> Self {
        let (events, _) = broadcast::channel(event_buffer.max(1));
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            graph: Arc::new(graph),
            events,
            versions: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn graph(&self) -> &InvalidationGraph {
        &self.graph
    }

    pub(crate) fn emit(&self, event: CacheEvent) {
        // No subscribers is the normal case for one-shot commands.
        let _ = self.events.send(event);
    }

    fn next_version(&self) -> u64 {
        self.versions.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Current value under `key`, regardless of staleness.
    pub async fn get<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .and_then(|entry| entry.data.as_ref())
            .and_then(|data| data.downcast_ref::<T>())
            .cloned()
    }

    /// Value under `key` if it is usable without refetching.
    ///
    /// Entries with unsettled optimistic writes always count as fresh so
    /// that a read never replaces them with server data that predates them.
    pub async fn fresh<T>(&self, key: &QueryKey, stale_time: Duration) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries.read().await;
        let hit = entries.get(key).and_then(|entry| {
            let value = entry.data.as_ref()?.downcast_ref::<T>()?;
            let fresh = match entry.state() {
                EntryState::Pending(_) => true,
                EntryState::Committed => !entry.stale && within(entry.updated_at, stale_time),
            };
            fresh.then(|| value.clone())
        });

        let result = if hit.is_some() { "hit" } else { "miss" };
        metrics::counter!("mealdeck_cache_lookups_total", "result" => result).increment(1);
        debug!(key = %key, result, "Cache lookup");
        hit
    }

    /// Stores a server-confirmed value.
    pub async fn set<T>(&self, key: &QueryKey, value: T)
    where
        T: Send + Sync + 'static,
    {
        let version = self.next_version();
        {
            let mut entries = self.entries.write().await;
            let entry = entries.entry(key.clone()).or_insert_with(Entry::empty);
            entry.data = Some(Arc::new(value));
            entry.version = version;
            entry.updated_at = Some(Utc::now());
            entry.stale = false;
            entry.error = None;
        }
        self.emit(CacheEvent::Updated {
            key: key.to_string(),
            version,
        });
    }

    /// Rewrites the value under `key` with `f` if it holds a `T`.
    ///
    /// Returns the entry as it was before the write, or `None` when nothing
    /// was written. Snapshot and write happen under one lock, and fetches
    /// already in flight for `key` are discarded when they land.
    pub(crate) async fn write_with<T, F>(
        &self,
        key: &QueryKey,
        f: F,
        write: Write,
    ) -> Option<Snapshot>
    where
        T: Send + Sync + 'static,
        F: FnOnce(&T) -> T,
    {
        let version = self.next_version();
        let previous = {
            let mut entries = self.entries.write().await;
            let entry = entries.get_mut(key)?;
            let current = entry.data.as_ref()?.downcast_ref::<T>()?;
            let next = f(current);

            let previous = Snapshot {
                key: key.clone(),
                data: entry.data.clone(),
                updated_at: entry.updated_at,
                stale: entry.stale,
                pending: entry.pending.clone(),
            };

            entry.data = Some(Arc::new(next));
            entry.version = version;
            entry.supersede_fetches();
            match write {
                Write::Optimistic(id) => {
                    if !entry.pending.contains(&id) {
                        entry.pending.push(id);
                    }
                }
                Write::Confirmed(id) => {
                    entry.pending.retain(|p| *p != id);
                    entry.updated_at = Some(Utc::now());
                    entry.stale = false;
                }
            }
            previous
        };

        self.emit(CacheEvent::Updated {
            key: key.to_string(),
            version,
        });
        Some(previous)
    }

    /// Puts back what a snapshot captured, including absence, and drops
    /// `transaction` from the entry's pending writers.
    ///
    /// The restored value is marked stale when the entry's other writers
    /// changed since the snapshot: it then holds optimistic data of a
    /// settled transaction, or lacks data of a newer one.
    pub async fn restore(&self, snapshot: Snapshot, transaction: TransactionId) {
        let version = self.next_version();
        let key = snapshot.key.to_string();
        {
            let mut entries = self.entries.write().await;
            let entry = entries
                .entry(snapshot.key)
                .or_insert_with(Entry::empty);
            entry.pending.retain(|p| *p != transaction);
            let outdated = snapshot.pending != entry.pending;
            if outdated {
                debug!(key = %key, "Restored value predates other writers");
            }

            entry.data = snapshot.data;
            entry.updated_at = snapshot.updated_at;
            entry.stale = snapshot.stale || outdated;
            entry.version = version;
            entry.supersede_fetches();
        }
        self.emit(CacheEvent::Updated { key, version });
    }

    /// Settles `transaction`'s optimistic write on `key`, if it has one.
    pub async fn mark_committed(&self, key: &QueryKey, transaction: TransactionId) -> bool {
        let committed = {
            let mut entries = self.entries.write().await;
            match entries.get_mut(key) {
                Some(entry) if entry.pending.contains(&transaction) => {
                    entry.pending.retain(|p| *p != transaction);
                    entry.updated_at = Some(Utc::now());
                    true
                }
                _ => false,
            }
        };
        if committed {
            self.emit(CacheEvent::Committed {
                key: key.to_string(),
                transaction: transaction.to_string(),
            });
        }
        committed
    }

    /// Marks every entry under `prefix` stale. Returns the number touched.
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let touched: Vec<QueryKey> = {
            let mut entries = self.entries.write().await;
            entries
                .iter_mut()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, entry)| {
                    entry.stale = true;
                    key.clone()
                })
                .collect()
        };

        for key in &touched {
            debug!(key = %key, "Invalidated");
            self.emit(CacheEvent::Invalidated {
                key: key.to_string(),
            });
        }
        touched.len()
    }

    /// Invalidates `keys` and everything the graph makes depend on them.
    pub async fn invalidate_with_dependents(&self, keys: &[QueryKey]) -> usize {
        let mut total = 0;
        for prefix in self.graph.expand(keys) {
            total += self.invalidate(&prefix).await;
        }
        total
    }

    /// Cancels in-flight fetches under `prefix`.
    ///
    /// The requests themselves keep running; their results are dropped by
    /// [`complete_fetch`](Self::complete_fetch).
    pub async fn cancel(&self, prefix: &QueryKey) {
        let mut entries = self.entries.write().await;
        for (key, entry) in entries.iter_mut().filter(|(key, _)| key.starts_with(prefix)) {
            if entry.fetching {
                debug!(key = %key, "Cancelling in-flight fetch");
            }
            entry.supersede_fetches();
        }
    }

    pub async fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(key.clone()).or_insert_with(Entry::empty);
        entry.generation += 1;
        entry.fetching = true;
        metrics::counter!("mealdeck_cache_fetches_total").increment(1);
        FetchTicket {
            key: key.clone(),
            generation: entry.generation,
        }
    }

    pub async fn complete_fetch<T>(
        &self,
        ticket: &FetchTicket,
        result: Result<T, ApiError>,
    ) -> FetchOutcome<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let version = self.next_version();
        let outcome = {
            let mut entries = self.entries.write().await;
            match entries.get_mut(&ticket.key) {
                // Server data never lands over unsettled optimistic writes.
                Some(entry)
                    if entry.generation == ticket.generation && entry.pending.is_empty() =>
                {
                    entry.fetching = false;
                    match result {
                        Ok(value) => {
                            entry.data = Some(Arc::new(value.clone()));
                            entry.version = version;
                            entry.updated_at = Some(Utc::now());
                            entry.stale = false;
                            entry.error = None;
                            FetchOutcome::Stored(value)
                        }
                        Err(error) => {
                            entry.error = Some(error.clone());
                            FetchOutcome::Failed(error)
                        }
                    }
                }
                _ => FetchOutcome::Discarded(result),
            }
        };

        match &outcome {
            FetchOutcome::Stored(_) => self.emit(CacheEvent::Updated {
                key: ticket.key.to_string(),
                version,
            }),
            FetchOutcome::Discarded(_) => {
                debug!(key = %ticket.key, "Discarding superseded fetch result");
                metrics::counter!("mealdeck_cache_discarded_fetches_total").increment(1);
                self.emit(CacheEvent::FetchDiscarded {
                    key: ticket.key.to_string(),
                });
            }
            FetchOutcome::Failed(_) => {}
        }
        outcome
    }

    /// Keys of every entry under `prefix` that currently holds data.
    pub async fn keys_under(&self, prefix: &QueryKey) -> Vec<QueryKey> {
        let entries = self.entries.read().await;
        let mut keys: Vec<QueryKey> = entries
            .iter()
            .filter(|(key, entry)| entry.data.is_some() && key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    pub async fn version(&self, key: &QueryKey) -> Option<u64> {
        self.entries.read().await.get(key).map(|entry| entry.version)
    }

    pub async fn entry_state(&self, key: &QueryKey) -> Option<EntryState> {
        self.entries.read().await.get(key).map(Entry::state)
    }

    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries
            .read()
            .await
            .get(key)
            .is_some_and(|entry| entry.stale)
    }

    /// Read-only view of an entry, for rendering loading and error states.
    pub async fn observe<T>(&self, key: &QueryKey, stale_time: Duration) -> QueryState<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let entries = self.entries.read().await;
        let Some(entry) = entries.get(key) else {
            return QueryState::idle();
        };

        let data = entry
            .data
            .as_ref()
            .and_then(|data| data.downcast_ref::<T>())
            .cloned();

        let status = match (&entry.error, &data, entry.fetching) {
            (Some(_), _, false) => QueryStatus::Error,
            (_, Some(_), _) => QueryStatus::Success,
            (_, None, true) => QueryStatus::Loading,
            (None, None, false) => QueryStatus::Idle,
        };

        QueryState {
            status,
            data,
            error: entry.error.clone(),
            is_stale: entry.stale || !within(entry.updated_at, stale_time),
            is_fetching: entry.fetching,
            updated_at: entry.updated_at,
        }
    }
}

fn within(updated_at: Option<DateTime<Utc>>, window: Duration) -> bool {
    let Some(updated_at) = updated_at else {
        return false;
    };
    let Ok(window) = chrono::Duration::from_std(window) else {
        return true;
    };
    Utc::now() - updated_at < window
}
