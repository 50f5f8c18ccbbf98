use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::FormErrors;
use crate::models::{Preferences, UpdatePreferencesInput};

pub const DIETARY_OPTIONS: [&str; 6] = [
    "vegetarian",
    "vegan",
    "gluten-free",
    "dairy-free",
    "low-carb",
    "low-sodium",
];

pub const CUISINE_OPTIONS: [&str; 6] = ["Asian", "Italian", "Mexican", "French", "Indian", "American"];

fn known(values: &[String], options: &[&str], label: &'static str) -> Result<(), ValidationError> {
    match values.iter().find(|v| !options.contains(&v.as_str())) {
        Some(unknown) => {
            let mut error = ValidationError::new("unknown_option");
            error.message = Some(Cow::Owned(format!("Unknown {label}: {unknown}")));
            Err(error)
        }
        None => Ok(()),
    }
}

fn known_dietary(values: &[String]) -> Result<(), ValidationError> {
    known(values, &DIETARY_OPTIONS, "dietary restriction")
}

fn known_cuisines(values: &[String]) -> Result<(), ValidationError> {
    known(values, &CUISINE_OPTIONS, "cuisine")
}

/// Editable copy of the user's preferences.
///
/// Tags toggle on and off; disliked ingredients are trimmed and kept
/// unique.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct PreferencesForm {
    #[validate(custom(function = "known_dietary"))]
    pub dietary_restrictions: Vec<String>,

    #[validate(custom(function = "known_cuisines"))]
    pub favorite_cuisines: Vec<String>,

    pub disliked_ingredients: Vec<String>,

    #[validate(length(max = 255, message = "Location must be 255 characters or less"))]
    pub location_name: String,

    pub location_lat: Option<f64>,

    pub location_lng: Option<f64>,
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(index) = values.iter().position(|v| v == value) {
        values.remove(index);
    } else {
        values.push(value.to_string());
    }
}

impl PreferencesForm {
    #[must_use]
    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self {
            dietary_restrictions: preferences.dietary_restrictions.clone(),
            favorite_cuisines: preferences.favorite_cuisines.clone(),
            disliked_ingredients: preferences.disliked_ingredients.clone(),
            location_name: preferences.location_name.clone().unwrap_or_default(),
            location_lat: preferences.location_lat,
            location_lng: preferences.location_lng,
        }
    }

    pub fn toggle_dietary(&mut self, tag: &str) {
        toggle(&mut self.dietary_restrictions, tag);
    }

    pub fn toggle_cuisine(&mut self, cuisine: &str) {
        toggle(&mut self.favorite_cuisines, cuisine);
    }

    /// Returns `false` when the ingredient is blank or already listed.
    pub fn add_ingredient(&mut self, ingredient: &str) -> bool {
        let ingredient = ingredient.trim();
        if ingredient.is_empty()
            || self
                .disliked_ingredients
                .iter()
                .any(|i| i.eq_ignore_ascii_case(ingredient))
        {
            return false;
        }
        self.disliked_ingredients.push(ingredient.to_string());
        true
    }

    pub fn remove_ingredient(&mut self, ingredient: &str) {
        self.disliked_ingredients
            .retain(|i| !i.eq_ignore_ascii_case(ingredient.trim()));
    }

    /// The full form as a partial update; every field is sent.
    pub fn to_input(&self) -> Result<UpdatePreferencesInput, FormErrors> {
        self.validate()?;

        let location = self.location_name.trim();
        Ok(UpdatePreferencesInput {
            dietary_restrictions: Some(self.dietary_restrictions.clone()),
            favorite_cuisines: Some(self.favorite_cuisines.clone()),
            disliked_ingredients: Some(self.disliked_ingredients.clone()),
            location_name: (!location.is_empty()).then(|| location.to_string()),
            location_lat: self.location_lat,
            location_lng: self.location_lng,
        })
    }
}
