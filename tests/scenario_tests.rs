//! End-to-end flows: pages over a real `ApiClient` talking HTTP to the
//! in-memory backend.

mod common;

use chrono::NaiveDate;
use common::{config, spawn_backend};
use mealdeck::Session;
use mealdeck::domain::MealType;
use mealdeck::domain::events::CacheEvent;
use mealdeck::pages::{Dashboard, Navigation, RecommendationsPage};
use std::sync::Arc;

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

async fn session() -> (common::Db, Session) {
    let (db, base_url) = spawn_backend().await;
    let config = config(&base_url);
    let api = mealdeck::clients::ApiClient::new(&config.api).unwrap();
    (db, Session::with_api(config, Arc::new(api)))
}

#[tokio::test]
async fn test_logged_breakfast_shows_on_dashboard() {
    let (_db, session) = session().await;
    let mut dashboard = Dashboard::new(&session, day("2026-01-11"));
    dashboard.load().await.unwrap();
    assert_eq!(dashboard.progress().to_string(), "0/3");

    dashboard.open_add(MealType::Breakfast);
    dashboard.actions.meal_form_mut().name = "Phở bò".to_string();
    dashboard.submit_meal().await.unwrap();

    let breakfast = dashboard.column(MealType::Breakfast);
    assert_eq!(breakfast.len(), 1);
    assert_eq!(breakfast[0].value().name, "Phở bò");
    assert!(!breakfast[0].is_pending());
    assert_eq!(dashboard.progress().to_string(), "1/3");
    assert!(dashboard.render().contains("Hà Nội"));
}

#[tokio::test]
async fn test_accepting_refreshed_recommendation() {
    let (db, session) = session().await;
    let mut page = RecommendationsPage::new(&session, day("2026-01-11"));
    page.select_meal_type(MealType::Lunch);

    page.refresh().await.unwrap();
    assert!(!page.shown().is_empty());
    let first = page.shown()[0].clone();

    let (meal, next) = page.accept(0).await.unwrap();
    assert_eq!(next, Navigation::Dashboard);
    assert_eq!(meal.name, first.name);
    assert_eq!(meal.description.as_deref(), Some(first.description.as_str()));
    assert_eq!(meal.meal_type, MealType::Lunch);
    assert_eq!(meal.date, day("2026-01-11"));
    assert_eq!(db.lock().unwrap().meals.len(), 1);

    let mut dashboard = Dashboard::new(&session, day("2026-01-11"));
    dashboard.load().await.unwrap();
    assert_eq!(dashboard.column(MealType::Lunch).len(), 1);
}

#[tokio::test]
async fn test_rating_invalidates_meal_views() {
    let (_db, session) = session().await;
    let mut dashboard = Dashboard::new(&session, day("2026-01-11"));
    dashboard.open_add(MealType::Dinner);
    dashboard.actions.meal_form_mut().name = "Lẩu".to_string();
    let meal = dashboard.submit_meal().await.unwrap();

    assert_eq!(session.ratings.for_meal(&meal.id).await.unwrap().count, 0);

    let mut events = session.subscribe();
    let record = dashboard.record(0).unwrap().clone();
    dashboard.actions.open_rate(&record).unwrap();
    dashboard.actions.rating_form_mut().rating = Some(4);
    dashboard.actions.submit_rating().await.unwrap();

    let mut invalidated = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let CacheEvent::Invalidated { key } = event {
            invalidated.push(key);
        }
    }
    assert!(invalidated.contains(&format!("ratings/detail/{}", meal.id)));
    assert!(invalidated.iter().any(|k| k.starts_with("meals/")));

    let summary = session.ratings.for_meal(&meal.id).await.unwrap();
    assert_eq!(summary.count, 1);
    assert!((summary.average - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_failed_delete_leaves_day_unchanged() {
    let (db, session) = session().await;
    let mut dashboard = Dashboard::new(&session, day("2026-01-11"));
    dashboard.open_add(MealType::Lunch);
    dashboard.actions.meal_form_mut().name = "Cơm tấm".to_string();
    dashboard.submit_meal().await.unwrap();

    // Removed behind the client's back, so the delete request 404s.
    db.lock().unwrap().meals.clear();
    let err = dashboard.delete(0, true).await.unwrap_err();

    assert_eq!(err.to_string(), "Meal not found");
    assert_eq!(dashboard.meals().len(), 1);
    assert!(dashboard.render().starts_with("! Meal not found"));
}
