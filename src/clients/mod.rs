//! Backend access: the HTTP wrapper, one module per resource, and the
//! [`MealApi`] seam the cache services are written against.

pub mod client;
pub mod error;
pub mod meals;
pub mod preferences;
pub mod ratings;
pub mod recommendations;
pub mod weather;

pub use client::ApiClient;
pub use error::{ApiError, ErrorCode};

use crate::domain::MealId;
use crate::models::{
    CreateMealInput, CreateRatingInput, Meal, MealList, MealsQuery, Preferences, Rating,
    RatingList, RecommendationSet, RecommendationsQuery, UpdateMealInput, UpdatePreferencesInput,
    Weather, WeatherQuery,
};

/// Every backend operation the client performs.
///
/// [`ApiClient`] is the production implementation; tests substitute an
/// in-memory backend.
#[async_trait::async_trait]
pub trait MealApi: Send + Sync {
    async fn get_meals(&self, query: &MealsQuery) -> Result<MealList, ApiError>;

    async fn get_meal(&self, id: &MealId) -> Result<Meal, ApiError>;

    async fn create_meal(&self, input: &CreateMealInput) -> Result<Meal, ApiError>;

    async fn update_meal(&self, id: &MealId, input: &UpdateMealInput) -> Result<Meal, ApiError>;

    /// Returns the server's confirmation message.
    async fn delete_meal(&self, id: &MealId) -> Result<String, ApiError>;

    async fn search_meal_names(&self, query: &str) -> Result<Vec<String>, ApiError>;

    async fn get_ratings(&self, meal_id: &MealId) -> Result<RatingList, ApiError>;

    async fn create_rating(&self, input: &CreateRatingInput) -> Result<Rating, ApiError>;

    async fn get_preferences(&self) -> Result<Preferences, ApiError>;

    async fn update_preferences(
        &self,
        input: &UpdatePreferencesInput,
    ) -> Result<Preferences, ApiError>;

    async fn get_recommendations(
        &self,
        query: &RecommendationsQuery,
    ) -> Result<RecommendationSet, ApiError>;

    async fn refresh_recommendations(
        &self,
        input: &RecommendationsQuery,
    ) -> Result<RecommendationSet, ApiError>;

    async fn get_weather(&self, query: WeatherQuery) -> Result<Weather, ApiError>;
}

#[async_trait::async_trait]
impl MealApi for ApiClient {
    async fn get_meals(&self, query: &MealsQuery) -> Result<MealList, ApiError> {
        Self::get_meals(self, query).await
    }

    async fn get_meal(&self, id: &MealId) -> Result<Meal, ApiError> {
        Self::get_meal(self, id).await
    }

    async fn create_meal(&self, input: &CreateMealInput) -> Result<Meal, ApiError> {
        Self::create_meal(self, input).await
    }

    async fn update_meal(&self, id: &MealId, input: &UpdateMealInput) -> Result<Meal, ApiError> {
        Self::update_meal(self, id, input).await
    }

    async fn delete_meal(&self, id: &MealId) -> Result<String, ApiError> {
        Self::delete_meal(self, id).await
    }

    async fn search_meal_names(&self, query: &str) -> Result<Vec<String>, ApiError> {
        Self::search_meal_names(self, query).await
    }

    async fn get_ratings(&self, meal_id: &MealId) -> Result<RatingList, ApiError> {
        Self::get_ratings(self, meal_id).await
    }

    async fn create_rating(&self, input: &CreateRatingInput) -> Result<Rating, ApiError> {
        Self::create_rating(self, input).await
    }

    async fn get_preferences(&self) -> Result<Preferences, ApiError> {
        Self::get_preferences(self).await
    }

    async fn update_preferences(
        &self,
        input: &UpdatePreferencesInput,
    ) -> Result<Preferences, ApiError> {
        Self::update_preferences(self, input).await
    }

    async fn get_recommendations(
        &self,
        query: &RecommendationsQuery,
    ) -> Result<RecommendationSet, ApiError> {
        Self::get_recommendations(self, query).await
    }

    async fn refresh_recommendations(
        &self,
        input: &RecommendationsQuery,
    ) -> Result<RecommendationSet, ApiError> {
        Self::refresh_recommendations(self, input).await
    }

    async fn get_weather(&self, query: WeatherQuery) -> Result<Weather, ApiError> {
        Self::get_weather(self, query).await
    }
}
