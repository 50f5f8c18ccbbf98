use tracing::{debug, warn};

use super::store::{Snapshot, Write};
use super::{QueryCache, QueryKey, TransactionId};
use crate::domain::events::CacheEvent;

/// Optimistic writes made on behalf of one mutation.
///
/// Each key is snapshotted the first time the transaction writes it.
/// `rollback` restores those snapshots; `commit` settles the
/// entries this transaction still owns to committed.
#[derive(Debug)]
pub struct Transaction {
    id: TransactionId,
    cache: QueryCache,
    snapshots: Vec<Snapshot>,
}

impl Transaction {
    /// Starts a transaction after cancelling fetches under `cancel_keys`.
    pub async fn begin(cache: &QueryCache, cancel_keys: &[QueryKey]) -> Self {
        for key in cancel_keys {
            cache.cancel(key).await;
        }
        Self {
            id: TransactionId::new(),
            cache: cache.clone(),
            snapshots: Vec::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> TransactionId {
        self.id
    }

    #[must_use]
    pub fn touched(&self) -> Vec<&QueryKey> {
        self.snapshots.iter().map(Snapshot::key).collect()
    }

    /// Optimistically rewrites `key` if it is cached as a `T`.
    pub async fn patch<T, F>(&mut self, key: &QueryKey, f: F) -> bool
    where
        T: Send + Sync + 'static,
        F: FnOnce(&T) -> T,
    {
        let Some(previous) = self
            .cache
            .write_with(key, f, Write::Optimistic(self.id))
            .await
        else {
            return false;
        };

        if !self.snapshots.iter().any(|s| s.key() == key) {
            self.snapshots.push(previous);
        }
        true
    }

    /// Applies `f` to every cached `T` under `prefix`.
    pub async fn patch_all<T, F>(&mut self, prefix: &QueryKey, f: F) -> usize
    where
        T: Send + Sync + 'static,
        F: Fn(&T) -> T,
    {
        let mut patched = 0;
        for key in self.cache.keys_under(prefix).await {
            if self.patch(&key, &f).await {
                patched += 1;
            }
        }
        patched
    }

    /// Writes server-confirmed data. Reconciled keys are not rolled back.
    pub async fn reconcile<T, F>(&mut self, key: &QueryKey, f: F) -> bool
    where
        T: Send + Sync + 'static,
        F: FnOnce(&T) -> T,
    {
        self.cache
            .write_with(key, f, Write::Confirmed(self.id))
            .await
            .is_some()
    }

    pub async fn reconcile_all<T, F>(&mut self, prefix: &QueryKey, f: F) -> usize
    where
        T: Send + Sync + 'static,
        F: Fn(&T) -> T,
    {
        let mut written = 0;
        for key in self.cache.keys_under(prefix).await {
            if self.reconcile(&key, &f).await {
                written += 1;
            }
        }
        written
    }

    pub async fn commit(self) {
        for snapshot in &self.snapshots {
            self.cache.mark_committed(snapshot.key(), self.id).await;
        }
        debug!(transaction = %self.id, keys = self.snapshots.len(), "Transaction committed");
    }

    /// Restores every touched key, newest snapshot first. Keys that other
    /// transactions wrote in the meantime come back stale.
    pub async fn rollback(self) {
        if !self.snapshots.is_empty() {
            warn!(transaction = %self.id, keys = self.snapshots.len(), "Rolling back optimistic writes");
            metrics::counter!("mealdeck_cache_rollbacks_total").increment(1);
        }
        for snapshot in self.snapshots.into_iter().rev() {
            let key = snapshot.key().to_string();
            self.cache.restore(snapshot, self.id).await;
            self.cache.emit(CacheEvent::RolledBack {
                key,
                transaction: self.id.to_string(),
            });
        }
    }
}
