use chrono::NaiveDate;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::FormErrors;
use crate::domain::MealType;
use crate::models::{CreateMealInput, Meal, UpdateMealInput};

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct MealForm {
    #[validate(
        custom(function = "required_text"),
        length(max = 255, message = "Meal name must be 255 characters or less")
    )]
    pub name: String,

    pub description: String,

    #[validate(required(message = "Meal type is required"))]
    pub meal_type: Option<MealType>,

    #[validate(required(message = "Date is required"))]
    pub date: Option<NaiveDate>,
}

fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed("Meal name is required"));
        return Err(error);
    }
    Ok(())
}

impl MealForm {
    /// Empty form preset to the slot the user picked.
    #[must_use]
    pub const fn for_slot(date: NaiveDate, meal_type: MealType) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            meal_type: Some(meal_type),
            date: Some(date),
        }
    }

    #[must_use]
    pub fn from_meal(meal: &Meal) -> Self {
        Self {
            name: meal.name.clone(),
            description: meal.description.clone().unwrap_or_default(),
            meal_type: Some(meal.meal_type),
            date: Some(meal.date),
        }
    }

    fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self.clone()
        }
    }

    pub fn to_create_input(&self) -> Result<CreateMealInput, FormErrors> {
        let form = self.normalized();
        form.validate()?;

        let (Some(meal_type), Some(date)) = (form.meal_type, form.date) else {
            return Err(FormErrors::single("meal_type", "Meal type is required"));
        };

        Ok(CreateMealInput {
            description: Some(form.description).filter(|d| !d.is_empty()),
            name: form.name,
            meal_type,
            date,
        })
    }

    /// Only the fields that differ from `meal`.
    pub fn to_update_input(&self, meal: &Meal) -> Result<UpdateMealInput, FormErrors> {
        let input = self.to_create_input()?;
        let current_description = meal.description.clone().unwrap_or_default();

        Ok(UpdateMealInput {
            name: (input.name != meal.name).then_some(input.name),
            description: match input.description {
                Some(d) if d != current_description => Some(d),
                None if !current_description.is_empty() => Some(String::new()),
                _ => None,
            },
            meal_type: (input.meal_type != meal.meal_type).then_some(input.meal_type),
            date: (input.date != meal.date).then_some(input.date),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fake::{day, meal};

    #[test]
    fn test_valid_form_becomes_input() {
        let form = MealForm {
            name: "  Phở bò ".to_string(),
            description: String::new(),
            ..MealForm::for_slot(day("2026-01-11"), MealType::Breakfast)
        };

        let input = form.to_create_input().unwrap();
        assert_eq!(input.name, "Phở bò");
        assert_eq!(input.description, None);
        assert_eq!(input.meal_type, MealType::Breakfast);
        assert_eq!(input.date, day("2026-01-11"));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let form = MealForm {
            name: "   ".to_string(),
            ..MealForm::for_slot(day("2026-01-11"), MealType::Lunch)
        };
        let errors = form.to_create_input().unwrap_err();
        assert_eq!(errors.field("name").unwrap(), ["Meal name is required"]);
    }

    #[test]
    fn test_name_limit_counts_characters() {
        let at_limit = MealForm {
            name: "ở".repeat(255),
            ..MealForm::for_slot(day("2026-01-11"), MealType::Lunch)
        };
        assert!(at_limit.to_create_input().is_ok());

        let over = MealForm {
            name: "a".repeat(256),
            ..at_limit
        };
        assert!(over.to_create_input().unwrap_err().field("name").is_some());
    }

    #[test]
    fn test_missing_type_and_date() {
        let form = MealForm {
            name: "Cơm".to_string(),
            ..MealForm::default()
        };
        let errors = form.to_create_input().unwrap_err();
        assert!(errors.field("meal_type").is_some());
        assert!(errors.field("date").is_some());
    }

    #[test]
    fn test_update_input_contains_only_changes() {
        let existing = meal("m1", "Bánh mì", MealType::Breakfast, "2026-01-11");
        let mut form = MealForm::from_meal(&existing);
        form.name = "Bánh mì chảo".to_string();

        let changes = form.to_update_input(&existing).unwrap();
        assert_eq!(changes.name.as_deref(), Some("Bánh mì chảo"));
        assert_eq!(changes.meal_type, None);
        assert_eq!(changes.date, None);
        assert_eq!(changes.description, None);

        let unchanged = MealForm::from_meal(&existing).to_update_input(&existing).unwrap();
        assert!(unchanged.is_empty());
    }
}
