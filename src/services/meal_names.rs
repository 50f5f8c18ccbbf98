use std::sync::Arc;

use crate::cache::{QueryCache, QueryOptions, fetch_query};
use crate::clients::{ApiError, MealApi};

/// Shortest query sent to the autocomplete endpoint.
pub const MIN_QUERY_CHARS: usize = 2;

pub mod keys {
    use crate::cache::QueryKey;

    #[must_use]
    pub fn all() -> QueryKey {
        QueryKey::root("mealNames")
    }

    #[must_use]
    pub fn search(query: &str) -> QueryKey {
        all().join("search").join(query)
    }
}

/// Autocomplete over previously logged meal names.
#[derive(Clone)]
pub struct MealNameService {
    api: Arc<dyn MealApi>,
    cache: QueryCache,
    options: QueryOptions,
}

impl MealNameService {
    #[must_use]
    pub fn new(api: Arc<dyn MealApi>, cache: QueryCache, options: QueryOptions) -> Self {
        Self {
            api,
            cache,
            options,
        }
    }

    /// Matching names; empty without a request for queries under
    /// [`MIN_QUERY_CHARS`] characters.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, ApiError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }
        fetch_query(&self.cache, &keys::search(query), &self.options, || async {
            self.api.search_meal_names(query).await
        })
        .await
    }
}
