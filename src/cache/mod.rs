//! Client-side query cache.
//!
//! Server data is cached under hierarchical [`QueryKey`]s. Reads go through
//! [`fetch_query`], writes through a [`Mutation`] driven by
//! [`mutation::run`], which applies an optimistic [`Transaction`] and
//! either commits or rolls it back when the server answers.

pub mod graph;
pub mod key;
pub mod mutation;
pub mod query;
pub mod record;
pub mod store;
pub mod transaction;

pub use graph::InvalidationGraph;
pub use key::QueryKey;
pub use mutation::Mutation;
pub use query::{QueryOptions, QueryState, QueryStatus, fetch_query};
pub use record::{Collection, Record, TransactionId, committed, confirm};
pub use store::{EntryState, FetchOutcome, FetchTicket, QueryCache, Snapshot};
pub use transaction::Transaction;
