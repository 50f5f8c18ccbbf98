use std::sync::Arc;
use tokio::sync::broadcast;

use crate::cache::QueryCache;
use crate::clients::{ApiClient, MealApi};
use crate::config::Config;
use crate::domain::events::CacheEvent;
use crate::services::{
    MealNameService, MealService, PreferencesService, RatingService, RecommendationService,
    WeatherService, default_graph,
};

/// Everything a page needs: one backend, one cache, and the services
/// built over them.
#[derive(Clone)]
pub struct Session {
    pub config: Arc<Config>,

    pub cache: QueryCache,

    pub meals: MealService,

    pub ratings: RatingService,

    pub preferences: PreferencesService,

    pub recommendations: RecommendationService,

    pub weather: WeatherService,

    pub meal_names: MealNameService,
}

impl Session {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let api = ApiClient::new(&config.api)?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    /// Builds a session over any backend, e.g. an in-memory one in tests.
    #[must_use]
    pub fn with_api(config: Config, api: Arc<dyn MealApi>) -> Self {
        let cache = QueryCache::new(default_graph(), config.cache.event_buffer);
        let defaults = config.cache.default_options();

        Self {
            meals: MealService::new(api.clone(), cache.clone(), defaults),
            ratings: RatingService::new(api.clone(), cache.clone(), defaults),
            preferences: PreferencesService::new(api.clone(), cache.clone(), defaults),
            recommendations: RecommendationService::new(api.clone(), cache.clone(), defaults),
            weather: WeatherService::new(api.clone(), cache.clone(), config.cache.weather_options()),
            meal_names: MealNameService::new(api, cache.clone(), config.cache.meal_name_options()),
            cache,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.cache.subscribe()
    }
}
