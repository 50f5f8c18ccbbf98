use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::{Mutation, QueryCache, QueryKey, QueryOptions, Transaction, fetch_query, mutation};
use crate::clients::{ApiError, MealApi};
use crate::models::{Preferences, UpdatePreferencesInput};

pub mod keys {
    use crate::cache::QueryKey;

    #[must_use]
    pub fn all() -> QueryKey {
        QueryKey::root("preferences")
    }

    #[must_use]
    pub fn detail() -> QueryKey {
        all().join("detail")
    }
}

#[derive(Clone)]
pub struct PreferencesService {
    api: Arc<dyn MealApi>,
    cache: QueryCache,
    options: QueryOptions,
}

impl PreferencesService {
    #[must_use]
    pub fn new(api: Arc<dyn MealApi>, cache: QueryCache, options: QueryOptions) -> Self {
        Self {
            api,
            cache,
            options,
        }
    }

    pub async fn get(&self) -> Result<Preferences, ApiError> {
        fetch_query(&self.cache, &keys::detail(), &self.options, || async {
            self.api.get_preferences().await
        })
        .await
    }

    pub async fn update(&self, input: UpdatePreferencesInput) -> Result<Preferences, ApiError> {
        mutation::run(&self.cache, self.api.as_ref(), &UpdatePreferences { input }).await
    }
}

pub struct UpdatePreferences {
    pub input: UpdatePreferencesInput,
}

#[async_trait]
impl Mutation for UpdatePreferences {
    type Output = Preferences;

    fn name(&self) -> &'static str {
        "update_preferences"
    }

    fn cancel_keys(&self) -> Vec<QueryKey> {
        vec![keys::all()]
    }

    async fn apply_optimistic(&self, txn: &mut Transaction) {
        txn.patch::<Preferences, _>(&keys::detail(), |current| current.merged(&self.input))
            .await;
    }

    async fn execute(&self, api: &dyn MealApi) -> Result<Preferences, ApiError> {
        api.update_preferences(&self.input).await
    }

    async fn reconcile(&self, txn: &mut Transaction, preferences: &Preferences) {
        txn.reconcile::<Preferences, _>(&keys::detail(), |_| preferences.clone())
            .await;
    }

    fn invalidate_keys(&self, _output: Option<&Preferences>) -> Vec<QueryKey> {
        vec![keys::all()]
    }
}
