use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::{Mutation, QueryCache, QueryKey, QueryOptions, fetch_query, mutation};
use crate::clients::{ApiError, MealApi};
use crate::models::{RecommendationSet, RecommendationsQuery};

pub mod keys {
    use crate::cache::QueryKey;
    use crate::models::RecommendationsQuery;

    #[must_use]
    pub fn all() -> QueryKey {
        QueryKey::root("recommendations")
    }

    #[must_use]
    pub fn detail(query: &RecommendationsQuery) -> QueryKey {
        all().join("detail").with_params(query)
    }
}

#[derive(Clone)]
pub struct RecommendationService {
    api: Arc<dyn MealApi>,
    cache: QueryCache,
    options: QueryOptions,
}

impl RecommendationService {
    #[must_use]
    pub fn new(api: Arc<dyn MealApi>, cache: QueryCache, options: QueryOptions) -> Self {
        Self {
            api,
            cache,
            options,
        }
    }

    pub async fn get(&self, query: &RecommendationsQuery) -> Result<RecommendationSet, ApiError> {
        fetch_query(&self.cache, &keys::detail(query), &self.options, || async {
            self.api.get_recommendations(query).await
        })
        .await
    }

    /// Asks for a new set. The result goes to the caller; the cached set is
    /// only invalidated.
    pub async fn refresh(
        &self,
        query: &RecommendationsQuery,
    ) -> Result<RecommendationSet, ApiError> {
        let mutation = RefreshRecommendations {
            query: query.clone(),
        };
        mutation::run(&self.cache, self.api.as_ref(), &mutation).await
    }
}

pub struct RefreshRecommendations {
    pub query: RecommendationsQuery,
}

#[async_trait]
impl Mutation for RefreshRecommendations {
    type Output = RecommendationSet;

    fn name(&self) -> &'static str {
        "refresh_recommendations"
    }

    fn cancel_keys(&self) -> Vec<QueryKey> {
        vec![keys::detail(&self.query)]
    }

    async fn execute(&self, api: &dyn MealApi) -> Result<RecommendationSet, ApiError> {
        api.refresh_recommendations(&self.query).await
    }

    fn invalidate_keys(&self, _output: Option<&RecommendationSet>) -> Vec<QueryKey> {
        vec![keys::detail(&self.query)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InvalidationGraph;
    use crate::domain::MealType;
    use crate::services::fake::{FakeApi, day};
    use std::time::Duration;

    fn setup() -> (Arc<FakeApi>, RecommendationService, QueryCache) {
        let api = Arc::new(FakeApi::default());
        let cache = QueryCache::new(InvalidationGraph::new(), 16);
        let options = QueryOptions {
            retry_delay: Duration::ZERO,
            ..QueryOptions::default()
        };
        let service = RecommendationService::new(api.clone(), cache.clone(), options);
        (api, service, cache)
    }

    #[tokio::test]
    async fn test_refresh_does_not_write_cached_set() {
        let (api, service, cache) = setup();
        let query = RecommendationsQuery::new(MealType::Lunch, Some(day("2026-01-11")));
        let cached = service.get(&query).await.unwrap();

        let refreshed = service.refresh(&query).await.unwrap();

        assert!(!refreshed.recommendations.is_empty());
        assert_ne!(refreshed.recommendations, cached.recommendations);
        assert_eq!(
            cache.get::<RecommendationSet>(&keys::detail(&query)).await,
            Some(cached)
        );
        assert!(cache.is_stale(&keys::detail(&query)).await);
        assert_eq!(api.calls("refresh_recommendations"), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_still_invalidates() {
        let (api, service, cache) = setup();
        let query = RecommendationsQuery::new(MealType::Dinner, None);
        service.get(&query).await.unwrap();
        api.fail("refresh_recommendations", ApiError::api("An error occurred", Some(500)));

        service.refresh(&query).await.unwrap_err();

        assert!(cache.is_stale(&keys::detail(&query)).await);
        assert_eq!(api.calls("refresh_recommendations"), 1);
    }

    #[tokio::test]
    async fn test_keys_differ_by_type_and_date() {
        let lunch = keys::detail(&RecommendationsQuery::new(MealType::Lunch, None));
        let dinner = keys::detail(&RecommendationsQuery::new(MealType::Dinner, None));
        let dated = keys::detail(&RecommendationsQuery::new(
            MealType::Lunch,
            Some(day("2026-01-11")),
        ));
        assert_ne!(lunch, dinner);
        assert_ne!(lunch, dated);
        assert!(lunch.starts_with(&keys::all()));
    }
}
