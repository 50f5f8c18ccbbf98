use std::fmt::Write;
use std::str::FromStr;

use super::{ErrorBanner, MealActions, PageError};
use crate::cache::{Collection, Record};
use crate::domain::MealType;
use crate::models::{Meal, MealsQuery};
use crate::render::meal_card;
use crate::state::Session;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(MealType),
}

impl TypeFilter {
    fn query(self) -> MealsQuery {
        match self {
            Self::All => MealsQuery::default(),
            Self::Only(meal_type) => MealsQuery::of_type(meal_type),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Every logged meal, newest first, narrowed by type and a search term.
pub struct History {
    session: Session,
    filter: TypeFilter,
    search: String,
    meals: Collection<Meal>,
    pub actions: MealActions,
    pub banner: ErrorBanner,
}

fn matches(meal: &Meal, needle: &str) -> bool {
    meal.name.to_lowercase().contains(needle)
        || meal
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(needle))
}

impl History {
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            filter: TypeFilter::All,
            search: String::new(),
            meals: Vec::new(),
            actions: MealActions::new(session),
            banner: ErrorBanner::default(),
        }
    }

    /// Takes effect on the next [`History::load`].
    pub const fn set_filter(&mut self, filter: TypeFilter) {
        self.filter = filter;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub async fn load(&mut self) -> Result<(), PageError> {
        let result = self.session.meals.list(&self.filter.query()).await;
        self.meals = self.banner.capture(result.map_err(PageError::from))?;
        Ok(())
    }

    /// Search applied client-side, sorted by date descending.
    #[must_use]
    pub fn visible(&self) -> Vec<&Record<Meal>> {
        let needle = self.search.trim().to_lowercase();
        let mut shown: Vec<&Record<Meal>> = self
            .meals
            .iter()
            .filter(|record| needle.is_empty() || matches(record.value(), &needle))
            .collect();
        shown.sort_by(|a, b| b.value().date.cmp(&a.value().date));
        shown
    }

    pub fn record(&self, index: usize) -> Result<&Record<Meal>, PageError> {
        self.visible()
            .into_iter()
            .nth(index)
            .ok_or_else(|| PageError::invalid("meal", format!("No meal #{}", index + 1)))
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = self.banner.render() {
            let _ = writeln!(out, "{banner}\n");
        }

        let shown = self.visible();
        if shown.is_empty() {
            out.push_str(if self.search.trim().is_empty() {
                "No meals logged yet."
            } else {
                "No meals match your search."
            });
            return out;
        }

        for (i, record) in shown.iter().enumerate() {
            let _ = writeln!(out, "#{} {}", i + 1, meal_card(record));
        }
        let _ = write!(out, "\n{} meal(s)", shown.len());
        out
    }
}
