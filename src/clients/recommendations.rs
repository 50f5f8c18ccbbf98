use reqwest::Method;

use super::{ApiClient, ApiError};
use crate::models::{RecommendationSet, RecommendationsQuery};

impl ApiClient {
    pub async fn get_recommendations(
        &self,
        query: &RecommendationsQuery,
    ) -> Result<RecommendationSet, ApiError> {
        self.get(&["api", "recommendations"], &query.to_params()).await
    }

    /// Asks the engine for a new set instead of the one it last produced.
    pub async fn refresh_recommendations(
        &self,
        input: &RecommendationsQuery,
    ) -> Result<RecommendationSet, ApiError> {
        self.send(Method::POST, &["api", "recommendations", "refresh"], input)
            .await
    }
}
