use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Identifies one optimistic mutation from its first cache write to its
/// commit or rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An item of a cached collection.
///
/// Items written optimistically stay `Pending` until the owning
/// transaction commits, so reconciliation matches them by transaction
/// rather than by any id convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Record<T> {
    Pending {
        transaction: TransactionId,
        value: T,
    },
    Committed(T),
}

impl<T> Record<T> {
    pub const fn pending(transaction: TransactionId, value: T) -> Self {
        Self::Pending { transaction, value }
    }

    pub const fn value(&self) -> &T {
        match self {
            Self::Pending { value, .. } | Self::Committed(value) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Pending { value, .. } | Self::Committed(value) => value,
        }
    }

    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub const fn transaction(&self) -> Option<TransactionId> {
        match self {
            Self::Pending { transaction, .. } => Some(*transaction),
            Self::Committed(_) => None,
        }
    }
}

/// A cached list whose items may be awaiting server confirmation.
pub type Collection<T> = Vec<Record<T>>;

pub fn committed<T>(items: impl IntoIterator<Item = T>) -> Collection<T> {
    items.into_iter().map(Record::Committed).collect()
}

/// Replaces every item pending under `transaction` with the confirmed value.
pub fn confirm<T: Clone>(items: &[Record<T>], transaction: TransactionId, value: &T) -> Collection<T> {
    items
        .iter()
        .map(|record| {
            if record.transaction() == Some(transaction) {
                Record::Committed(value.clone())
            } else {
                record.clone()
            }
        })
        .collect()
}
