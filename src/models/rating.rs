use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{MealId, RatingId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: RatingId,

    pub meal_id: MealId,

    /// Stars, 1 to 5.
    pub rating: u8,

    #[serde(default)]
    pub comment: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Rating {
    /// Locally synthesized rating shown while a create request is in flight.
    #[must_use]
    pub fn placeholder(input: &CreateRatingInput, now: DateTime<Utc>) -> Self {
        Self {
            id: RatingId::default(),
            meal_id: input.meal_id.clone(),
            rating: input.rating,
            comment: input.comment.clone(),
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRatingInput {
    pub meal_id: MealId,

    pub rating: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingList {
    pub ratings: Vec<Rating>,

    #[serde(default)]
    pub average: f64,

    #[serde(default)]
    pub count: u32,
}
