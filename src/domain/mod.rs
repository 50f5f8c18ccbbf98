//! Domain primitives shared by the API layer, the cache and the pages.
//!
//! Identifiers are newtypes so a meal id can never be passed where a rating
//! id is expected.

pub mod events;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-issued identifier of a meal.
///
/// # Examples
///
/// ```rust
/// use mealdeck::domain::MealId;
///
/// let id = MealId::new("cm5x1");
/// assert_eq!(id.as_str(), "cm5x1");
/// assert_eq!(id.to_string(), "cm5x1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealId(String);

impl MealId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty id never reaches the server; queries keyed on it are disabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MealId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MealId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Server-issued identifier of a rating.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingId(String);

impl RatingId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RatingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three fixed meal slots of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// Display order used by the dashboard columns.
    pub const ALL: [Self; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];

    /// Wire value, as sent in query strings and request bodies.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "BREAKFAST",
            Self::Lunch => "LUNCH",
            Self::Dinner => "DINNER",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" | "b" => Ok(Self::Breakfast),
            "lunch" | "l" => Ok(Self::Lunch),
            "dinner" | "d" => Ok(Self::Dinner),
            other => Err(format!(
                "Unknown meal type '{other}'. Expected breakfast, lunch or dinner"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_id_conversions() {
        let id = MealId::from("abc");
        assert_eq!(id.as_str(), "abc");
        assert_eq!(id.to_string(), "abc");
        assert!(!id.is_empty());
        assert!(MealId::default().is_empty());
    }

    #[test]
    fn meal_id_serializes_as_plain_string() {
        let id = MealId::new("m-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"m-1\"");
        let back: MealId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn meal_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&MealType::Breakfast).unwrap(),
            "\"BREAKFAST\""
        );
        let parsed: MealType = serde_json::from_str("\"DINNER\"").unwrap();
        assert_eq!(parsed, MealType::Dinner);
        assert!(serde_json::from_str::<MealType>("\"BRUNCH\"").is_err());
    }

    #[test]
    fn meal_type_from_cli_input() {
        assert_eq!("Lunch".parse::<MealType>().unwrap(), MealType::Lunch);
        assert_eq!("BREAKFAST".parse::<MealType>().unwrap(), MealType::Breakfast);
        assert_eq!("d".parse::<MealType>().unwrap(), MealType::Dinner);
        assert!("supper".parse::<MealType>().is_err());
    }

    #[test]
    fn meal_type_order_matches_day() {
        assert_eq!(
            MealType::ALL,
            [MealType::Breakfast, MealType::Lunch, MealType::Dinner]
        );
    }
}
