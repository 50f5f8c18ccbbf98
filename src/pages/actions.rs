use chrono::NaiveDate;
use tracing::debug;

use super::PageError;
use crate::cache::Record;
use crate::domain::MealType;
use crate::forms::{Dialog, MealForm, RatingForm};
use crate::models::{Meal, Rating};
use crate::services::{MealService, RatingService};
use crate::state::Session;

/// The add/edit/delete/rate controls shared by the dashboard and history.
///
/// Each write goes through a dialog; the dialog closes only after the
/// server accepts the change. Records still awaiting confirmation cannot
/// be edited, deleted or rated.
#[derive(Clone)]
pub struct MealActions {
    meals: MealService,
    ratings: RatingService,
    meal_dialog: Dialog<MealForm>,
    editing: Option<Meal>,
    rating_dialog: Dialog<RatingForm>,
    rating_meal: Option<Meal>,
}

fn confirmed(record: &Record<Meal>) -> Result<&Meal, PageError> {
    if record.is_pending() {
        return Err(PageError::invalid("meal", "Meal is still being saved"));
    }
    Ok(record.value())
}

impl MealActions {
    #[must_use]
    pub fn new(session: &Session) -> Self {
        Self {
            meals: session.meals.clone(),
            ratings: session.ratings.clone(),
            meal_dialog: Dialog::default(),
            editing: None,
            rating_dialog: Dialog::default(),
            rating_meal: None,
        }
    }

    pub fn open_add(&mut self, date: NaiveDate, meal_type: MealType) {
        self.editing = None;
        self.meal_dialog.open_with(MealForm::for_slot(date, meal_type));
    }

    pub fn open_edit(&mut self, record: &Record<Meal>) -> Result<(), PageError> {
        let meal = confirmed(record)?;
        self.meal_dialog.open_with(MealForm::from_meal(meal));
        self.editing = Some(meal.clone());
        Ok(())
    }

    #[must_use]
    pub const fn meal_dialog(&self) -> &Dialog<MealForm> {
        &self.meal_dialog
    }

    pub const fn meal_form_mut(&mut self) -> &mut MealForm {
        self.meal_dialog.form_mut()
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&Meal> {
        self.editing.as_ref()
    }

    pub fn cancel_meal(&mut self) {
        self.meal_dialog.close();
        self.editing = None;
    }

    /// Creates or updates depending on how the dialog was opened.
    pub async fn submit_meal(&mut self) -> Result<Meal, PageError> {
        let saved = if let Some(meal) = &self.editing {
            let changes = self.meal_dialog.prepare(|form| form.to_update_input(meal))?;
            if changes.is_empty() {
                debug!(meal = %meal.id, "No changes to save");
                meal.clone()
            } else {
                self.meals.update(meal, changes).await?
            }
        } else {
            let input = self.meal_dialog.prepare(MealForm::to_create_input)?;
            self.meals.create(input).await?
        };

        self.cancel_meal();
        Ok(saved)
    }

    /// Deletes only when the user confirmed; `Ok(None)` otherwise.
    pub async fn delete(
        &self,
        record: &Record<Meal>,
        confirm: bool,
    ) -> Result<Option<String>, PageError> {
        let meal = confirmed(record)?;
        if !confirm {
            return Ok(None);
        }
        Ok(Some(self.meals.delete(meal).await?))
    }

    pub fn open_rate(&mut self, record: &Record<Meal>) -> Result<(), PageError> {
        let meal = confirmed(record)?;
        self.rating_dialog.open_with(RatingForm::default());
        self.rating_meal = Some(meal.clone());
        Ok(())
    }

    pub const fn rating_form_mut(&mut self) -> &mut RatingForm {
        self.rating_dialog.form_mut()
    }

    #[must_use]
    pub const fn rating_dialog(&self) -> &Dialog<RatingForm> {
        &self.rating_dialog
    }

    pub fn cancel_rating(&mut self) {
        self.rating_dialog.close();
        self.rating_meal = None;
    }

    pub async fn submit_rating(&mut self) -> Result<Rating, PageError> {
        let Some(meal) = &self.rating_meal else {
            return Err(PageError::invalid("rating", "No meal selected"));
        };
        let input = self.rating_dialog.prepare(|form| form.to_input(&meal.id))?;
        let rating = self.ratings.create(input).await?;

        self.cancel_rating();
        Ok(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TransactionId;
    use crate::clients::ApiError;
    use crate::config::Config;
    use crate::services::fake::{FakeApi, day, meal};
    use std::sync::Arc;

    fn setup(meals: Vec<Meal>) -> (Arc<FakeApi>, Session) {
        let api = Arc::new(FakeApi::with_meals(meals));
        let session = Session::with_api(Config::default(), api.clone());
        (api, session)
    }

    #[tokio::test]
    async fn test_add_closes_dialog_on_success() {
        let (api, session) = setup(Vec::new());
        let mut actions = MealActions::new(&session);

        actions.open_add(day("2026-01-11"), MealType::Dinner);
        actions.meal_form_mut().name = "Bún chả".to_string();
        let saved = actions.submit_meal().await.unwrap();

        assert_eq!(saved.meal_type, MealType::Dinner);
        assert!(!actions.meal_dialog().is_open());
        assert_eq!(api.meals().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_sends_nothing() {
        let (api, session) = setup(Vec::new());
        let mut actions = MealActions::new(&session);

        actions.open_add(day("2026-01-11"), MealType::Lunch);
        let err = actions.submit_meal().await.unwrap_err();

        assert!(matches!(err, PageError::Validation(_)));
        assert!(actions.meal_dialog().is_open());
        assert_eq!(api.calls("create_meal"), 0);
    }

    #[tokio::test]
    async fn test_server_rejection_keeps_dialog_open() {
        let (api, session) = setup(Vec::new());
        api.fail("create_meal", ApiError::api("Invalid meal", Some(400)));
        let mut actions = MealActions::new(&session);

        actions.open_add(day("2026-01-11"), MealType::Lunch);
        actions.meal_form_mut().name = "Cơm tấm".to_string();
        let err = actions.submit_meal().await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid meal");
        assert!(actions.meal_dialog().is_open());
        assert_eq!(actions.meal_dialog().form().name, "Cơm tấm");
    }

    #[tokio::test]
    async fn test_edit_without_changes_skips_request() {
        let existing = meal("m1", "Phở bò", MealType::Breakfast, "2026-01-11");
        let (api, session) = setup(vec![existing.clone()]);
        let mut actions = MealActions::new(&session);

        actions.open_edit(&Record::Committed(existing.clone())).unwrap();
        let saved = actions.submit_meal().await.unwrap();

        assert_eq!(saved, existing);
        assert_eq!(api.calls("update_meal"), 0);
        assert!(actions.editing().is_none());
    }

    #[tokio::test]
    async fn test_pending_records_are_locked() {
        let (api, session) = setup(Vec::new());
        let mut actions = MealActions::new(&session);
        let pending = Record::pending(
            TransactionId::new(),
            meal("", "Phở gà", MealType::Lunch, "2026-01-11"),
        );

        assert!(actions.open_edit(&pending).is_err());
        assert!(actions.open_rate(&pending).is_err());
        assert!(actions.delete(&pending, true).await.is_err());
        assert_eq!(api.calls("delete_meal"), 0);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let existing = meal("m1", "Phở bò", MealType::Breakfast, "2026-01-11");
        let (api, session) = setup(vec![existing.clone()]);
        let actions = MealActions::new(&session);
        let record = Record::Committed(existing);

        assert_eq!(actions.delete(&record, false).await.unwrap(), None);
        assert_eq!(api.calls("delete_meal"), 0);

        let message = actions.delete(&record, true).await.unwrap();
        assert_eq!(message.as_deref(), Some("Meal deleted successfully"));
        assert!(api.meals().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_rating_blocks_submission() {
        let existing = meal("m1", "Phở bò", MealType::Breakfast, "2026-01-11");
        let (api, session) = setup(vec![existing.clone()]);
        let mut actions = MealActions::new(&session);

        actions.open_rate(&Record::Committed(existing)).unwrap();
        actions.rating_form_mut().rating = Some(6);
        assert!(actions.submit_rating().await.is_err());
        assert_eq!(api.calls("create_rating"), 0);

        actions.rating_form_mut().rating = Some(5);
        let rating = actions.submit_rating().await.unwrap();
        assert_eq!(rating.rating, 5);
        assert!(!actions.rating_dialog().is_open());
    }
}
