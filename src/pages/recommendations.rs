use chrono::NaiveDate;
use std::fmt::Write;
use tracing::info;

use super::{ErrorBanner, Navigation, PageError};
use crate::domain::MealType;
use crate::models::{Meal, Recommendation, RecommendationsQuery};
use crate::render::dates::{format_with_weekday, shift_days};
use crate::render::recommendation_card;
use crate::state::Session;

/// Suggestions for one slot (date and meal type).
///
/// A refreshed set is shown until the slot changes or the page reloads,
/// at which point the cached set is read again.
pub struct RecommendationsPage {
    session: Session,
    today: NaiveDate,
    date: NaiveDate,
    meal_type: MealType,
    shown: Vec<Recommendation>,
    pub banner: ErrorBanner,
}

impl RecommendationsPage {
    #[must_use]
    pub fn new(session: &Session, today: NaiveDate) -> Self {
        Self {
            session: session.clone(),
            today,
            date: today,
            meal_type: MealType::Breakfast,
            shown: Vec::new(),
            banner: ErrorBanner::default(),
        }
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub const fn meal_type(&self) -> MealType {
        self.meal_type
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.date = date;
        self.shown.clear();
    }

    pub fn previous_day(&mut self) {
        self.select_date(shift_days(self.date, -1));
    }

    pub fn next_day(&mut self) {
        self.select_date(shift_days(self.date, 1));
    }

    pub fn go_to_today(&mut self) {
        self.select_date(self.today);
    }

    pub fn select_meal_type(&mut self, meal_type: MealType) {
        self.meal_type = meal_type;
        self.shown.clear();
    }

    fn query(&self) -> RecommendationsQuery {
        RecommendationsQuery::new(self.meal_type, Some(self.date))
    }

    #[must_use]
    pub fn shown(&self) -> &[Recommendation] {
        &self.shown
    }

    pub async fn load(&mut self) -> Result<(), PageError> {
        let result = self.session.recommendations.get(&self.query()).await;
        let set = self.banner.capture(result.map_err(PageError::from))?;
        self.shown = set.recommendations;
        Ok(())
    }

    pub async fn refresh(&mut self) -> Result<(), PageError> {
        let result = self.session.recommendations.refresh(&self.query()).await;
        let set = self.banner.capture(result.map_err(PageError::from))?;
        self.shown = set.recommendations;
        Ok(())
    }

    /// Asks for a different set; the backend decides what counts as new.
    pub async fn skip(&mut self) -> Result<(), PageError> {
        self.refresh().await
    }

    /// Logs the suggestion at `index` in the page's slot and hands over to
    /// the dashboard.
    pub async fn accept(&mut self, index: usize) -> Result<(Meal, Navigation), PageError> {
        let Some(chosen) = self.shown.get(index) else {
            return self.banner.capture(Err(PageError::invalid(
                "recommendation",
                format!("No recommendation #{}", index + 1),
            )));
        };

        let input = chosen.to_meal_input(self.meal_type, self.date);
        let result = self.session.meals.create(input).await;
        let meal = self.banner.capture(result.map_err(PageError::from))?;
        info!(meal = %meal.id, name = %meal.name, "Accepted recommendation");
        Ok((meal, Navigation::Dashboard))
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = self.banner.render() {
            let _ = writeln!(out, "{banner}\n");
        }
        let _ = writeln!(
            out,
            "{} suggestions for {}",
            self.meal_type.label(),
            format_with_weekday(self.date)
        );

        if self.shown.is_empty() {
            out.push_str("\nNo suggestions yet. Try refreshing.");
            return out;
        }
        for (i, recommendation) in self.shown.iter().enumerate() {
            let _ = writeln!(out, "\n{}", recommendation_card(i + 1, recommendation));
        }
        out
    }
}
