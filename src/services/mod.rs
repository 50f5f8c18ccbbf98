//! Query and mutation services, one per backend resource.
//!
//! Each service reads through the shared [`QueryCache`](crate::cache::QueryCache)
//! and writes through [`mutation::run`](crate::cache::mutation::run), so
//! callers never touch cache keys directly.

pub mod meal_names;
pub use meal_names::MealNameService;

pub mod meals;
pub use meals::MealService;

pub mod preferences;
pub use preferences::PreferencesService;

pub mod ratings;
pub use ratings::{RatingService, RatingSummary};

pub mod recommendations;
pub use recommendations::RecommendationService;

pub mod weather;
pub use weather::WeatherService;

#[cfg(test)]
pub(crate) mod fake;

use crate::cache::InvalidationGraph;

/// Cross-resource edges: meals embed their ratings.
#[must_use]
pub fn default_graph() -> InvalidationGraph {
    InvalidationGraph::new().with_edge(ratings::keys::all(), meals::keys::all())
}
