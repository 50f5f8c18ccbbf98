use reqwest::Method;
use serde::Deserialize;

use super::{ApiClient, ApiError};
use crate::models::{Preferences, UpdatePreferencesInput};

#[derive(Deserialize)]
struct PreferencesBody {
    preferences: Preferences,
}

impl ApiClient {
    pub async fn get_preferences(&self) -> Result<Preferences, ApiError> {
        let body: PreferencesBody = self.get(&["api", "preferences"], &[]).await?;
        Ok(body.preferences)
    }

    pub async fn update_preferences(
        &self,
        input: &UpdatePreferencesInput,
    ) -> Result<Preferences, ApiError> {
        let body: PreferencesBody = self
            .send(Method::PUT, &["api", "preferences"], input)
            .await?;
        Ok(body.preferences)
    }
}
