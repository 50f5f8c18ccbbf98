use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::store::FetchOutcome;
use super::{QueryCache, QueryKey};
use crate::clients::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub stale_time: Duration,
    pub retry: u32,
    pub retry_delay: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            retry: 1,
            retry_delay: Duration::from_millis(500),
        }
    }
}

impl QueryOptions {
    #[must_use]
    pub const fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of a query for rendering: what is cached and how it got there.
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub is_stale: bool,
    pub is_fetching: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> QueryState<T> {
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_stale: true,
            is_fetching: false,
            updated_at: None,
        }
    }
}

/// Returns the cached value for `key` when fresh, otherwise fetches it.
///
/// Failed fetches are retried `options.retry` times. If the entry is
/// cancelled while the request is in flight, the response is dropped and
/// the value written in the meantime is returned instead.
pub async fn fetch_query<T, F, Fut>(
    cache: &QueryCache,
    key: &QueryKey,
    options: &QueryOptions,
    fetcher: F,
) -> Result<T, ApiError>
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    if let Some(value) = cache.fresh::<T>(key, options.stale_time).await {
        return Ok(value);
    }

    let ticket = cache.begin_fetch(key).await;
    let result = with_retry(key, options, fetcher).await;

    match cache.complete_fetch(&ticket, result).await {
        FetchOutcome::Stored(value) => Ok(value),
        FetchOutcome::Failed(error) => Err(error),
        FetchOutcome::Discarded(result) => match cache.get::<T>(key).await {
            Some(current) => Ok(current),
            None => result,
        },
    }
}

async fn with_retry<T, F, Fut>(
    key: &QueryKey,
    options: &QueryOptions,
    fetcher: F,
) -> Result<T, ApiError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < options.retry => {
                attempt += 1;
                warn!(key = %key, attempt, error = %error, "Query failed, retrying");
                metrics::counter!("mealdeck_cache_retries_total").increment(1);
                tokio::time::sleep(options.retry_delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
