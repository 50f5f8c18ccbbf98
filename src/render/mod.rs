//! Plain-text rendering of entities for the terminal.

pub mod cards;
pub mod dates;

pub use cards::{meal_card, recommendation_card, weather_widget};
