//! In-memory backend for service and page tests.

use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::clients::{ApiError, MealApi};
use crate::domain::{MealId, MealType, RatingId};
use crate::models::{
    CreateMealInput, CreateRatingInput, Difficulty, Meal, MealList, MealsQuery, Preferences,
    Rating, RatingList, Recommendation, RecommendationContext, RecommendationSet,
    RecommendationsQuery, UpdateMealInput, UpdatePreferencesInput, Weather, WeatherQuery,
};

pub fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

pub fn meal(id: &str, name: &str, meal_type: MealType, date: &str) -> Meal {
    Meal {
        id: MealId::new(id),
        name: name.to_string(),
        description: None,
        meal_type,
        date: day(date),
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
        ratings: None,
    }
}

pub fn recommendation(name: &str) -> Recommendation {
    Recommendation {
        name: name.to_string(),
        description: format!("{name}, freshly made"),
        reasoning: "Warm and light for a cool day".to_string(),
        cooking_time: "30 phút".to_string(),
        difficulty: Difficulty::Easy,
        calories: Some("450".to_string()),
        protein: None,
        ingredients: Some(vec!["rice noodles".to_string(), "beef".to_string()]),
    }
}

struct State {
    meals: Vec<Meal>,
    ratings: Vec<Rating>,
    preferences: Preferences,
    names: Vec<String>,
    next_id: u32,
    refreshes: u32,
}

/// Backend double recording every call.
///
/// Operations can be made to fail with [`FakeApi::fail`]. While a test
/// holds [`FakeApi::gate`], `get_meals` answers with the data it saw when
/// the call started, which simulates a slow response. Holding
/// [`FakeApi::create_gate`] parks `create_meal` calls in arrival order.
pub struct FakeApi {
    state: Mutex<State>,
    calls: Mutex<HashMap<&'static str, u32>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
    pub gate: tokio::sync::Mutex<()>,
    pub create_gate: tokio::sync::Mutex<()>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            state: Mutex::new(State {
                meals: Vec::new(),
                ratings: Vec::new(),
                preferences: Preferences {
                    id: "prefs".to_string(),
                    dietary_restrictions: Vec::new(),
                    favorite_cuisines: vec!["Asian".to_string()],
                    disliked_ingredients: Vec::new(),
                    location_name: Some("Hà Nội".to_string()),
                    location_lat: None,
                    location_lng: None,
                    updated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
                },
                names: vec!["Phở bò".to_string(), "Phở gà".to_string(), "Bún chả".to_string()],
                next_id: 100,
                refreshes: 0,
            }),
            calls: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            gate: tokio::sync::Mutex::new(()),
            create_gate: tokio::sync::Mutex::new(()),
        }
    }
}

impl FakeApi {
    pub fn with_meals(meals: Vec<Meal>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().meals = meals;
        api
    }

    pub fn fail(&self, operation: &'static str, error: ApiError) {
        self.failures.lock().unwrap().insert(operation, error);
    }

    pub fn calls(&self, operation: &str) -> u32 {
        self.calls
            .lock()
            .unwrap()
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub fn meals(&self) -> Vec<Meal> {
        self.state.lock().unwrap().meals.clone()
    }

    fn record(&self, operation: &'static str) -> Result<(), ApiError> {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
        match self.failures.lock().unwrap().get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::api("Meal not found", Some(404)).with_server_code(Some("NOT_FOUND".to_string()))
    }

    fn recommendations(names: &[&str]) -> RecommendationSet {
        RecommendationSet {
            recommendations: names.iter().map(|n| recommendation(n)).collect(),
            context: RecommendationContext::default(),
            generated_at: Utc::now(),
        }
    }
}

#[async_trait::async_trait]
impl MealApi for FakeApi {
    async fn get_meals(&self, query: &MealsQuery) -> Result<MealList, ApiError> {
        self.record("get_meals")?;
        let meals: Vec<Meal> = self
            .state
            .lock()
            .unwrap()
            .meals
            .iter()
            .filter(|m| query.start_date.is_none_or(|d| m.date >= d))
            .filter(|m| query.end_date.is_none_or(|d| m.date <= d))
            .filter(|m| query.meal_type.is_none_or(|t| m.meal_type == t))
            .cloned()
            .collect();
        let _slow = self.gate.lock().await;
        let total = meals.len() as u64;
        Ok(MealList { meals, total })
    }

    async fn get_meal(&self, id: &MealId) -> Result<Meal, ApiError> {
        self.record("get_meal")?;
        self.state
            .lock()
            .unwrap()
            .meals
            .iter()
            .find(|m| &m.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_meal(&self, input: &CreateMealInput) -> Result<Meal, ApiError> {
        self.record("create_meal")?;
        let _slow = self.create_gate.lock().await;
        if input.name.trim().is_empty() {
            return Err(ApiError::api("Meal name is required", Some(400)));
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let meal = Meal {
            id: MealId::new(format!("meal-{}", state.next_id)),
            ..Meal::placeholder(input, Utc::now())
        };
        state.meals.push(meal.clone());
        Ok(meal)
    }

    async fn update_meal(&self, id: &MealId, input: &UpdateMealInput) -> Result<Meal, ApiError> {
        self.record("update_meal")?;
        let mut state = self.state.lock().unwrap();
        let meal = state
            .meals
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(Self::not_found)?;
        *meal = meal.merged(input);
        Ok(meal.clone())
    }

    async fn delete_meal(&self, id: &MealId) -> Result<String, ApiError> {
        self.record("delete_meal")?;
        let mut state = self.state.lock().unwrap();
        let before = state.meals.len();
        state.meals.retain(|m| &m.id != id);
        if state.meals.len() == before {
            return Err(Self::not_found());
        }
        Ok("Meal deleted successfully".to_string())
    }

    async fn search_meal_names(&self, query: &str) -> Result<Vec<String>, ApiError> {
        self.record("search_meal_names")?;
        let needle = query.to_lowercase();
        Ok(self
            .state
            .lock()
            .unwrap()
            .names
            .iter()
            .filter(|n| n.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get_ratings(&self, meal_id: &MealId) -> Result<RatingList, ApiError> {
        self.record("get_ratings")?;
        let ratings: Vec<Rating> = self
            .state
            .lock()
            .unwrap()
            .ratings
            .iter()
            .filter(|r| &r.meal_id == meal_id)
            .cloned()
            .collect();
        let count = u32::try_from(ratings.len()).unwrap();
        let average = if count == 0 {
            0.0
        } else {
            f64::from(ratings.iter().map(|r| u32::from(r.rating)).sum::<u32>()) / f64::from(count)
        };
        Ok(RatingList {
            ratings,
            average,
            count,
        })
    }

    async fn create_rating(&self, input: &CreateRatingInput) -> Result<Rating, ApiError> {
        self.record("create_rating")?;
        if !(1..=5).contains(&input.rating) {
            return Err(ApiError::api("Rating must be between 1 and 5", Some(400)));
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let rating = Rating {
            id: RatingId::new(format!("rating-{}", state.next_id)),
            ..Rating::placeholder(input, Utc::now())
        };
        state.ratings.push(rating.clone());
        Ok(rating)
    }

    async fn get_preferences(&self) -> Result<Preferences, ApiError> {
        self.record("get_preferences")?;
        Ok(self.state.lock().unwrap().preferences.clone())
    }

    async fn update_preferences(
        &self,
        input: &UpdatePreferencesInput,
    ) -> Result<Preferences, ApiError> {
        self.record("update_preferences")?;
        let mut state = self.state.lock().unwrap();
        state.preferences = state.preferences.merged(input);
        state.preferences.updated_at = Utc::now();
        Ok(state.preferences.clone())
    }

    async fn get_recommendations(
        &self,
        query: &RecommendationsQuery,
    ) -> Result<RecommendationSet, ApiError> {
        self.record("get_recommendations")?;
        let _ = query;
        Ok(Self::recommendations(&["Phở bò", "Bún chả"]))
    }

    async fn refresh_recommendations(
        &self,
        input: &RecommendationsQuery,
    ) -> Result<RecommendationSet, ApiError> {
        self.record("refresh_recommendations")?;
        let round = {
            let mut state = self.state.lock().unwrap();
            state.refreshes += 1;
            state.refreshes
        };
        let first = format!("Cơm tấm #{round}");
        let _ = input;
        Ok(Self::recommendations(&[first.as_str(), "Gỏi cuốn"]))
    }

    async fn get_weather(&self, query: WeatherQuery) -> Result<Weather, ApiError> {
        self.record("get_weather")?;
        let location = match (query.lat, query.lng) {
            (Some(lat), Some(lng)) => format!("{lat:.2},{lng:.2}"),
            _ => "Hà Nội".to_string(),
        };
        Ok(Weather {
            temp: 18.5,
            condition: "Clouds".to_string(),
            description: "overcast clouds".to_string(),
            icon: "04d".to_string(),
            humidity: 80.0,
            wind_speed: 3.2,
            location,
            fetched_at: Utc::now(),
        })
    }
}
