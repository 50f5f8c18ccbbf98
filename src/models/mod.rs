//! Wire shapes of the meal-tracking backend.
//!
//! All payloads are camelCase JSON. The backend owns these records; the
//! client only ever holds cached copies.

pub mod meal;
pub mod preferences;
pub mod rating;
pub mod recommendation;
pub mod weather;

pub use meal::{CreateMealInput, Meal, MealList, MealsQuery, UpdateMealInput};
pub use preferences::{Preferences, UpdatePreferencesInput};
pub use rating::{CreateRatingInput, Rating, RatingList};
pub use recommendation::{
    Difficulty, Recommendation, RecommendationContext, RecommendationSet, RecommendationsQuery,
};
pub use weather::{Weather, WeatherQuery};

/// Calendar-day fields.
///
/// The backend stores meal dates as timestamps at midnight UTC and may send
/// either `2026-01-11` or `2026-01-11T00:00:00.000Z`; only the day is kept.
pub(crate) mod day {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(day);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.date_naive())
            .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
    }
}
