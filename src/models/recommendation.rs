use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::CreateMealInput;
use crate::domain::MealType;

/// Effort level as reported by the recommendation engine.
///
/// The backend sends Vietnamese labels; they are kept verbatim on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "Dễ")]
    Easy,
    #[serde(rename = "Trung bình")]
    Medium,
    #[serde(rename = "Khó")]
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub name: String,

    pub description: String,

    pub reasoning: String,

    pub cooking_time: String,

    pub difficulty: Difficulty,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<String>>,
}

impl Recommendation {
    /// The meal recorded when the user accepts this suggestion.
    #[must_use]
    pub fn to_meal_input(&self, meal_type: MealType, date: NaiveDate) -> CreateMealInput {
        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        CreateMealInput {
            name: self.name.clone(),
            description,
            meal_type,
            date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherContext {
    #[serde(default)]
    pub condition: String,

    #[serde(default)]
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub name: String,

    pub meal_type: MealType,

    #[serde(deserialize_with = "super::day::deserialize")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSnapshot {
    #[serde(default)]
    pub favorite_cuisines: Vec<String>,

    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

/// What the engine looked at when producing a set of suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationContext {
    #[serde(default)]
    pub weather: WeatherContext,

    #[serde(default)]
    pub meal_history: Vec<HistoryEntry>,

    #[serde(default)]
    pub preferences: PreferenceSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub recommendations: Vec<Recommendation>,

    #[serde(default)]
    pub context: RecommendationContext,

    pub generated_at: DateTime<Utc>,
}

/// Parameters of both the read and the refresh endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsQuery {
    pub meal_type: MealType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl RecommendationsQuery {
    #[must_use]
    pub const fn new(meal_type: MealType, date: Option<NaiveDate>) -> Self {
        Self { meal_type, date }
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("mealType", self.meal_type.as_str().to_string())];
        if let Some(date) = self.date {
            params.push(("date", date.to_string()));
        }
        params
    }
}
