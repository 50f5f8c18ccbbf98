//! Page containers.
//!
//! A page owns only transient UI state (selected date, filters, open
//! dialogs, the last error) and reads everything else through the
//! session's services, so two pages looking at the same data always agree.

pub mod actions;
pub mod dashboard;
pub mod history;
pub mod recommendations;
pub mod settings;

pub use actions::MealActions;
pub use dashboard::{Dashboard, Progress, QuickAction};
pub use history::{History, TypeFilter};
pub use recommendations::RecommendationsPage;
pub use settings::SettingsPage;

use std::fmt;
use thiserror::Error;

use crate::clients::ApiError;
use crate::forms::FormErrors;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    #[error("{0}")]
    Validation(#[from] FormErrors),

    #[error("{0}")]
    Api(#[from] ApiError),
}

impl PageError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FormErrors::single(field, message))
    }
}

/// Where a page asks to go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Dashboard,
    History,
    Recommendations,
    Settings,
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dashboard => "dashboard",
            Self::History => "history",
            Self::Recommendations => "recommend",
            Self::Settings => "settings",
        })
    }
}

/// The dismissible alert at the top of a page. Holds the most recent
/// failure until dismissed or replaced.
#[derive(Debug, Clone, Default)]
pub struct ErrorBanner {
    error: Option<PageError>,
}

impl ErrorBanner {
    /// Passes `result` through, remembering its error.
    pub fn capture<T>(&mut self, result: Result<T, PageError>) -> Result<T, PageError> {
        if let Err(error) = &result {
            self.error = Some(error.clone());
        }
        result
    }

    pub fn dismiss(&mut self) {
        self.error = None;
    }

    #[must_use]
    pub const fn error(&self) -> Option<&PageError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.error.as_ref().map(|e| format!("! {e}"))
    }
}
