use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user's singleton preference record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub id: String,

    #[serde(default)]
    pub dietary_restrictions: Vec<String>,

    #[serde(default)]
    pub favorite_cuisines: Vec<String>,

    #[serde(default)]
    pub disliked_ingredients: Vec<String>,

    #[serde(default)]
    pub location_name: Option<String>,

    #[serde(default)]
    pub location_lat: Option<f64>,

    #[serde(default)]
    pub location_lng: Option<f64>,

    pub updated_at: DateTime<Utc>,
}

impl Preferences {
    /// Shallow merge: every field present in `input` replaces the stored one.
    #[must_use]
    pub fn merged(&self, input: &UpdatePreferencesInput) -> Self {
        let mut merged = self.clone();
        if let Some(v) = &input.dietary_restrictions {
            merged.dietary_restrictions.clone_from(v);
        }
        if let Some(v) = &input.favorite_cuisines {
            merged.favorite_cuisines.clone_from(v);
        }
        if let Some(v) = &input.disliked_ingredients {
            merged.disliked_ingredients.clone_from(v);
        }
        if let Some(v) = &input.location_name {
            merged.location_name = Some(v.clone());
        }
        if let Some(v) = input.location_lat {
            merged.location_lat = Some(v);
        }
        if let Some(v) = input.location_lng {
            merged.location_lng = Some(v);
        }
        merged
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_cuisines: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disliked_ingredients: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_lat: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_lng: Option<f64>,
}
