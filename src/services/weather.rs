use std::sync::Arc;

use crate::cache::{QueryCache, QueryOptions, fetch_query};
use crate::clients::{ApiError, MealApi};
use crate::models::{Weather, WeatherQuery};

pub mod keys {
    use crate::cache::QueryKey;
    use crate::models::WeatherQuery;

    #[must_use]
    pub fn all() -> QueryKey {
        QueryKey::root("weather")
    }

    #[must_use]
    pub fn current(query: WeatherQuery) -> QueryKey {
        all().join("current").with_params(&query)
    }
}

/// Current conditions, cached for the weather staleness window.
#[derive(Clone)]
pub struct WeatherService {
    api: Arc<dyn MealApi>,
    cache: QueryCache,
    options: QueryOptions,
}

impl WeatherService {
    #[must_use]
    pub fn new(api: Arc<dyn MealApi>, cache: QueryCache, options: QueryOptions) -> Self {
        Self {
            api,
            cache,
            options,
        }
    }

    pub async fn current(&self, query: WeatherQuery) -> Result<Weather, ApiError> {
        fetch_query(&self.cache, &keys::current(query), &self.options, || async move {
            self.api.get_weather(query).await
        })
        .await
    }
}
