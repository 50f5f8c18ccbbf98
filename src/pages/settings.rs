use chrono::Utc;
use std::fmt::Write;

use super::{ErrorBanner, PageError};
use crate::forms::PreferencesForm;
use crate::forms::preferences::{CUISINE_OPTIONS, DIETARY_OPTIONS};
use crate::models::Preferences;
use crate::render::dates::{format_date_time, relative_time};
use crate::state::Session;

pub struct SettingsPage {
    session: Session,
    form: PreferencesForm,
    saved: Option<Preferences>,
    pub banner: ErrorBanner,
}

fn checklist(options: &[&str], selected: &[String]) -> String {
    options
        .iter()
        .map(|option| {
            let mark = if selected.iter().any(|s| s == option) { 'x' } else { ' ' };
            format!("[{mark}] {option}")
        })
        .collect::<Vec<_>>()
        .join("  ")
}

impl SettingsPage {
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            form: PreferencesForm::default(),
            saved: None,
            banner: ErrorBanner::default(),
        }
    }

    /// Replaces the form with the stored preferences, discarding edits.
    pub async fn load(&mut self) -> Result<(), PageError> {
        let result = self.session.preferences.get().await;
        let preferences = self.banner.capture(result.map_err(PageError::from))?;
        self.form = PreferencesForm::from_preferences(&preferences);
        self.saved = Some(preferences);
        Ok(())
    }

    #[must_use]
    pub const fn form(&self) -> &PreferencesForm {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut PreferencesForm {
        &mut self.form
    }

    pub async fn submit(&mut self) -> Result<Preferences, PageError> {
        let input = self.banner.capture(self.form.to_input().map_err(PageError::from))?;
        let result = self.session.preferences.update(input).await;
        let preferences = self.banner.capture(result.map_err(PageError::from))?;
        self.form = PreferencesForm::from_preferences(&preferences);
        self.saved = Some(preferences.clone());
        Ok(preferences)
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(banner) = self.banner.render() {
            let _ = writeln!(out, "{banner}\n");
        }

        let form = &self.form;
        let _ = writeln!(out, "Dietary:   {}", checklist(&DIETARY_OPTIONS, &form.dietary_restrictions));
        let _ = writeln!(out, "Cuisines:  {}", checklist(&CUISINE_OPTIONS, &form.favorite_cuisines));
        let disliked = if form.disliked_ingredients.is_empty() {
            "(none)".to_string()
        } else {
            form.disliked_ingredients.join(", ")
        };
        let _ = writeln!(out, "Disliked:  {disliked}");
        let location = if form.location_name.is_empty() {
            "(not set)"
        } else {
            form.location_name.as_str()
        };
        let _ = write!(out, "Location:  {location}");

        if let Some(saved) = &self.saved {
            let _ = write!(
                out,
                "\nUpdated:   {} ({})",
                format_date_time(saved.updated_at),
                relative_time(saved.updated_at, Utc::now())
            );
        }
        out
    }
}
