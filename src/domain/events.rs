//! Cache change notifications.
//!
//! Every write, invalidation and rollback in the query cache is broadcast so
//! that whatever renders cached data can redraw without polling.

use serde::Serialize;

/// Events published on the cache's broadcast channel.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum CacheEvent {
    Updated {
        key: String,
        version: u64,
    },
    Invalidated {
        key: String,
    },
    FetchDiscarded {
        key: String,
    },
    Committed {
        key: String,
        transaction: String,
    },
    RolledBack {
        key: String,
        transaction: String,
    },
    MutationFailed {
        mutation: String,
        message: String,
    },
}

impl CacheEvent {
    /// Key the event refers to, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Updated { key, .. }
            | Self::Invalidated { key }
            | Self::FetchDiscarded { key }
            | Self::Committed { key, .. }
            | Self::RolledBack { key, .. } => Some(key),
            Self::MutationFailed { .. } => None,
        }
    }
}
