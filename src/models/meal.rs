use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Rating;
use crate::domain::{MealId, MealType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: MealId,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub meal_type: MealType,

    #[serde(deserialize_with = "super::day::deserialize")]
    pub date: NaiveDate,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Vec<Rating>>,
}

impl Meal {
    /// Locally synthesized meal shown while a create request is in flight.
    ///
    /// It carries no id: the cache tracks it by transaction, not by id.
    #[must_use]
    pub fn placeholder(input: &CreateMealInput, now: DateTime<Utc>) -> Self {
        Self {
            id: MealId::default(),
            name: input.name.clone(),
            description: input.description.clone(),
            meal_type: input.meal_type,
            date: input.date,
            created_at: now,
            ratings: None,
        }
    }

    /// Returns a copy with every field present in `changes` overwritten.
    #[must_use]
    pub fn merged(&self, changes: &UpdateMealInput) -> Self {
        let mut meal = self.clone();
        if let Some(name) = &changes.name {
            meal.name.clone_from(name);
        }
        if let Some(description) = &changes.description {
            meal.description = Some(description.clone());
        }
        if let Some(meal_type) = changes.meal_type {
            meal.meal_type = meal_type;
        }
        if let Some(date) = changes.date {
            meal.date = date;
        }
        meal
    }

    /// Mean of the attached ratings, `None` when the meal is unrated.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_rating(&self) -> Option<f64> {
        let ratings = self.ratings.as_deref()?;
        if ratings.is_empty() {
            return None;
        }
        let sum: u32 = ratings.iter().map(|r| u32::from(r.rating)).sum();
        Some(f64::from(sum) / ratings.len() as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealInput {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub meal_type: MealType,

    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl UpdateMealInput {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.meal_type.is_none()
            && self.date.is_none()
    }
}

/// Filters accepted by `GET /api/meals`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl MealsQuery {
    /// A single day, as used by the dashboard buckets.
    #[must_use]
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            start_date: Some(day),
            end_date: Some(day),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn of_type(meal_type: MealType) -> Self {
        Self {
            meal_type: Some(meal_type),
            ..Self::default()
        }
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(start) = self.start_date {
            params.push(("startDate", start.to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("endDate", end.to_string()));
        }
        if let Some(meal_type) = self.meal_type {
            params.push(("mealType", meal_type.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset", offset.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealList {
    pub meals: Vec<Meal>,

    #[serde(default)]
    pub total: u64,
}
