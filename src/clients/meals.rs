use reqwest::Method;
use serde::Deserialize;

use super::{ApiClient, ApiError};
use crate::domain::MealId;
use crate::models::{CreateMealInput, Meal, MealList, MealsQuery, UpdateMealInput};

#[derive(Deserialize)]
struct MealBody {
    meal: Meal,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Deserialize)]
struct NamesBody {
    names: Vec<String>,
}

const MEALS: [&str; 2] = ["api", "meals"];

fn meal_segments(id: &MealId) -> [&str; 3] {
    ["api", "meals", id.as_str()]
}

impl ApiClient {
    pub async fn get_meals(&self, query: &MealsQuery) -> Result<MealList, ApiError> {
        self.get(&MEALS, &query.to_params()).await
    }

    pub async fn get_meal(&self, id: &MealId) -> Result<Meal, ApiError> {
        let body: MealBody = self.get(&meal_segments(id), &[]).await?;
        Ok(body.meal)
    }

    pub async fn create_meal(&self, input: &CreateMealInput) -> Result<Meal, ApiError> {
        let body: MealBody = self.send(Method::POST, &MEALS, input).await?;
        Ok(body.meal)
    }

    pub async fn update_meal(&self, id: &MealId, input: &UpdateMealInput) -> Result<Meal, ApiError> {
        let body: MealBody = self.send(Method::PUT, &meal_segments(id), input).await?;
        Ok(body.meal)
    }

    pub async fn delete_meal(&self, id: &MealId) -> Result<String, ApiError> {
        let body: MessageBody = self.delete(&meal_segments(id)).await?;
        Ok(body.message)
    }

    /// Previously used meal names for autocomplete.
    pub async fn search_meal_names(&self, query: &str) -> Result<Vec<String>, ApiError> {
        let body: NamesBody = self
            .get(&["api", "meals", "search", "names"], &[("query", query.to_string())])
            .await?;
        Ok(body.names)
    }
}
