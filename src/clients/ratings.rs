use reqwest::Method;
use serde::Deserialize;

use super::{ApiClient, ApiError};
use crate::domain::MealId;
use crate::models::{CreateRatingInput, Rating, RatingList};

#[derive(Deserialize)]
struct RatingBody {
    rating: Rating,
}

impl ApiClient {
    pub async fn get_ratings(&self, meal_id: &MealId) -> Result<RatingList, ApiError> {
        self.get(&["api", "ratings"], &[("mealId", meal_id.to_string())])
            .await
    }

    pub async fn create_rating(&self, input: &CreateRatingInput) -> Result<Rating, ApiError> {
        let body: RatingBody = self.send(Method::POST, &["api", "ratings"], input).await?;
        Ok(body.rating)
    }
}
