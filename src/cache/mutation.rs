use async_trait::async_trait;
use tracing::{info, warn};

use super::{QueryCache, QueryKey, Transaction};
use crate::clients::{ApiError, MealApi};
use crate::domain::events::CacheEvent;

/// A server write with an optimistic cache effect.
///
/// Implementations describe what the write does to cached data; [`run`]
/// owns the ordering: cancel, optimistic write, request, reconcile or
/// roll back, then invalidate.
#[async_trait]
pub trait Mutation: Send + Sync {
    type Output: Send + Sync;

    fn name(&self) -> &'static str;

    /// Prefixes whose in-flight fetches must not land after the optimistic
    /// write.
    fn cancel_keys(&self) -> Vec<QueryKey>;

    async fn apply_optimistic(&self, _txn: &mut Transaction) {}

    async fn execute(&self, api: &dyn MealApi) -> Result<Self::Output, ApiError>;

    async fn reconcile(&self, _txn: &mut Transaction, _output: &Self::Output) {}

    /// Prefixes to invalidate once the mutation settles, whatever the
    /// outcome. Graph dependents are added by [`run`].
    fn invalidate_keys(&self, output: Option<&Self::Output>) -> Vec<QueryKey>;
}

/// Runs `mutation` against `api`, keeping `cache` consistent with the
/// outcome. Mutations are never retried.
pub async fn run<M>(cache: &QueryCache, api: &dyn MealApi, mutation: &M) -> Result<M::Output, ApiError>
where
    M: Mutation,
{
    let mut txn = Transaction::begin(cache, &mutation.cancel_keys()).await;
    mutation.apply_optimistic(&mut txn).await;

    let result = mutation.execute(api).await;

    match &result {
        Ok(output) => {
            mutation.reconcile(&mut txn, output).await;
            info!(mutation = mutation.name(), transaction = %txn.id(), "Mutation succeeded");
            txn.commit().await;
            metrics::counter!("mealdeck_mutations_total", "outcome" => "success").increment(1);
        }
        Err(error) => {
            warn!(mutation = mutation.name(), error = %error, code = %error.code, "Mutation failed");
            txn.rollback().await;
            cache.emit(CacheEvent::MutationFailed {
                mutation: mutation.name().to_string(),
                message: error.message.clone(),
            });
            metrics::counter!("mealdeck_mutations_total", "outcome" => "failure").increment(1);
        }
    }

    let keys = mutation.invalidate_keys(result.as_ref().ok());
    cache.invalidate_with_dependents(&keys).await;

    result
}
