use validator::Validate;

use super::FormErrors;
use crate::domain::MealId;
use crate::models::CreateRatingInput;

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct RatingForm {
    #[validate(
        required(message = "Please choose a rating"),
        range(min = 1, max = 5, message = "Rating must be between 1 and 5")
    )]
    pub rating: Option<u8>,

    #[validate(length(max = 1000, message = "Comment must be 1000 characters or less"))]
    pub comment: String,
}

impl RatingForm {
    #[must_use]
    pub fn new(rating: u8, comment: impl Into<String>) -> Self {
        Self {
            rating: Some(rating),
            comment: comment.into(),
        }
    }

    /// Validates the form for `meal_id`; nothing is sent when this fails.
    pub fn to_input(&self, meal_id: &MealId) -> Result<CreateRatingInput, FormErrors> {
        self.validate()?;

        let Some(rating) = self.rating else {
            return Err(FormErrors::single("rating", "Please choose a rating"));
        };
        if meal_id.is_empty() {
            return Err(FormErrors::single("meal_id", "Meal is required"));
        }

        let comment = self.comment.trim();
        Ok(CreateRatingInput {
            meal_id: meal_id.clone(),
            rating,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
        })
    }
}
