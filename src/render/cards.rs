use std::fmt::Write;

use super::dates::format_with_weekday;
use crate::cache::Record;
use crate::models::{Meal, Recommendation, Weather};

/// Ingredients listed before the rest collapse into `+N`.
const MAX_INGREDIENTS: usize = 6;

#[must_use]
pub fn rating_badge(meal: &Meal) -> Option<String> {
    meal.average_rating().map(|avg| format!("★ {avg:.1}"))
}

/// A logged meal. Unconfirmed meals are marked `(saving…)` and carry no id.
#[must_use]
pub fn meal_card(record: &Record<Meal>) -> String {
    let meal = record.value();
    let mut out = format!("[{}] {}", meal.meal_type.label(), meal.name);

    if let Some(badge) = rating_badge(meal) {
        let _ = write!(out, "  {badge}");
    }
    if record.is_pending() {
        out.push_str("  (saving…)");
    }
    if let Some(description) = meal.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(out, "\n  {description}");
    }

    let _ = write!(out, "\n  {}", format_with_weekday(meal.date));
    if !meal.id.is_empty() {
        let _ = write!(out, " | id: {}", meal.id);
    }
    out
}

#[must_use]
pub fn recommendation_card(index: usize, recommendation: &Recommendation) -> String {
    let mut out = format!("{index}. {}", recommendation.name);

    if !recommendation.description.is_empty() {
        let _ = write!(out, "\n   {}", recommendation.description);
    }

    let mut facts = vec![
        format!("Difficulty: {}", recommendation.difficulty),
        format!("Time: {}", recommendation.cooking_time),
    ];
    if let Some(calories) = &recommendation.calories {
        facts.push(format!("Calories: {calories}"));
    }
    if let Some(protein) = &recommendation.protein {
        facts.push(format!("Protein: {protein}"));
    }
    let _ = write!(out, "\n   {}", facts.join(" | "));

    if let Some(ingredients) = recommendation.ingredients.as_ref().filter(|i| !i.is_empty()) {
        let shown: Vec<&str> = ingredients
            .iter()
            .take(MAX_INGREDIENTS)
            .map(String::as_str)
            .collect();
        let _ = write!(out, "\n   Ingredients: {}", shown.join(", "));
        if ingredients.len() > MAX_INGREDIENTS {
            let _ = write!(out, " +{}", ingredients.len() - MAX_INGREDIENTS);
        }
    }

    if !recommendation.reasoning.is_empty() {
        let _ = write!(out, "\n   Why: {}", recommendation.reasoning);
    }
    out
}

#[must_use]
pub fn weather_widget(weather: &Weather) -> String {
    format!(
        "{:.0}°C {} ({}) · {} · humidity {:.0}% · wind {:.1} m/s",
        weather.temp,
        weather.condition,
        weather.description,
        weather.location,
        weather.humidity,
        weather.wind_speed
    )
}
