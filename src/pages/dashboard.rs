use chrono::NaiveDate;
use std::fmt::{self, Write};
use tracing::warn;

use super::{ErrorBanner, MealActions, Navigation, PageError};
use crate::cache::{Collection, Record};
use crate::domain::MealType;
use crate::models::{Meal, Weather, WeatherQuery};
use crate::render::dates::{shift_days, smart_label};
use crate::render::{meal_card, weather_widget};
use crate::state::Session;

/// Meals per day the progress bar counts towards.
pub const DAILY_TARGET: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub logged: usize,
    pub target: usize,
}

impl Progress {
    /// Capped at 100 once the target is met.
    #[must_use]
    pub fn percent(&self) -> u8 {
        let percent = (self.logged * 100).checked_div(self.target).map_or(100, |p| p.min(100));
        u8::try_from(percent).unwrap_or(100)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.logged, self.target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub target: Navigation,
}

/// One day of meals in breakfast/lunch/dinner columns.
pub struct Dashboard {
    session: Session,
    today: NaiveDate,
    selected: NaiveDate,
    meals: Collection<Meal>,
    weather: Option<Weather>,
    pub actions: MealActions,
    pub banner: ErrorBanner,
}

impl Dashboard {
    #[must_use]
    pub fn new(session: &Session, today: NaiveDate) -> Self {
        Self {
            session: session.clone(),
            today,
            selected: today,
            meals: Vec::new(),
            weather: None,
            actions: MealActions::new(session),
            banner: ErrorBanner::default(),
        }
    }

    #[must_use]
    pub const fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    pub fn previous_day(&mut self) {
        self.selected = shift_days(self.selected, -1);
    }

    pub fn next_day(&mut self) {
        self.selected = shift_days(self.selected, 1);
    }

    pub fn go_to_today(&mut self) {
        self.selected = self.today;
    }

    #[must_use]
    pub fn is_today(&self) -> bool {
        self.selected == self.today
    }

    /// Reads the selected day's meals and the current weather. A weather
    /// failure only hides the widget.
    pub async fn load(&mut self) -> Result<(), PageError> {
        let result = self.session.meals.by_date(self.selected).await;
        self.meals = self.banner.capture(result.map_err(PageError::from))?;

        match self.session.weather.current(WeatherQuery::default()).await {
            Ok(weather) => self.weather = Some(weather),
            Err(error) => {
                warn!(error = %error, "Weather unavailable");
                self.weather = None;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn meals(&self) -> &[Record<Meal>] {
        &self.meals
    }

    #[must_use]
    pub fn column(&self, meal_type: MealType) -> Vec<&Record<Meal>> {
        self.meals
            .iter()
            .filter(|record| record.value().meal_type == meal_type)
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            logged: self.meals.len(),
            target: DAILY_TARGET,
        }
    }

    #[must_use]
    pub fn quick_action(&self) -> QuickAction {
        match self.meals.len() {
            0 => QuickAction {
                label: "Add your first meal",
                target: Navigation::Recommendations,
            },
            n if n < DAILY_TARGET => QuickAction {
                label: "Add another meal",
                target: Navigation::Recommendations,
            },
            _ => QuickAction {
                label: "View history",
                target: Navigation::History,
            },
        }
    }

    pub fn open_add(&mut self, meal_type: MealType) {
        self.actions.open_add(self.selected, meal_type);
    }

    /// Submits the meal dialog and reloads the day.
    pub async fn submit_meal(&mut self) -> Result<Meal, PageError> {
        let result = self.actions.submit_meal().await;
        let meal = self.banner.capture(result)?;
        self.load().await?;
        Ok(meal)
    }

    pub async fn delete(&mut self, index: usize, confirm: bool) -> Result<Option<String>, PageError> {
        let record = self.record(index)?.clone();
        let result = self.actions.delete(&record, confirm).await;
        let message = self.banner.capture(result)?;
        self.load().await?;
        Ok(message)
    }

    /// The meal at `index` in the flattened column order shown by
    /// [`Dashboard::render`].
    pub fn record(&self, index: usize) -> Result<&Record<Meal>, PageError> {
        MealType::ALL
            .iter()
            .flat_map(|t| self.column(*t))
            .nth(index)
            .ok_or_else(|| PageError::invalid("meal", format!("No meal #{}", index + 1)))
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = self.banner.render() {
            let _ = writeln!(out, "{banner}\n");
        }

        let progress = self.progress();
        let _ = writeln!(
            out,
            "{}  ·  {} meals ({}%)",
            smart_label(self.selected, self.today),
            progress,
            progress.percent()
        );
        if let Some(weather) = &self.weather {
            let _ = writeln!(out, "{}", weather_widget(weather));
        }

        let mut index = 0;
        for meal_type in MealType::ALL {
            let _ = writeln!(out, "\n== {} ==", meal_type.label());
            let column = self.column(meal_type);
            if column.is_empty() {
                let _ = writeln!(out, "  (nothing logged)");
            }
            for record in column {
                index += 1;
                let _ = writeln!(out, "#{index} {}", meal_card(record));
            }
        }

        let action = self.quick_action();
        let _ = write!(out, "\n→ {} (mealdeck {})", action.label, action.target);
        out
    }
}
