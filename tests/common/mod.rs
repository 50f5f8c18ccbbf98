//! An in-memory meal backend served over HTTP by axum, speaking the same
//! `{ success, data, error }` envelope as the real one.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use mealdeck::config::Config;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct Backend {
    pub meals: Vec<Value>,
    pub ratings: Vec<Value>,
    pub requests: Vec<String>,
    next_id: u32,
    refreshes: u32,
}

pub type Db = Arc<Mutex<Backend>>;

type Reply = (StatusCode, Json<Value>);

pub fn ok(data: Value) -> Reply {
    (StatusCode::OK, Json(json!({ "success": true, "data": data })))
}

fn not_found(what: &str) -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": { "message": format!("{what} not found"), "code": "NOT_FOUND" }
        })),
    )
}

fn log(db: &Db, line: String) {
    db.lock().unwrap().requests.push(line);
}

fn day_of(meal: &Value) -> &str {
    meal["date"].as_str().map_or("", |d| &d[..10])
}

pub fn recommendation(name: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} nóng hổi"),
        "reasoning": "Trời se lạnh",
        "cookingTime": "30 phút",
        "difficulty": "Dễ",
        "calories": "450",
        "ingredients": ["bánh phở", "thịt bò", "hành"]
    })
}

async fn list_meals(State(db): State<Db>, Query(params): Query<HashMap<String, String>>) -> Reply {
    let mut keys: Vec<_> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    keys.sort();
    log(&db, format!("GET /api/meals?{}", keys.join("&")));

    let backend = db.lock().unwrap();
    let meals: Vec<Value> = backend
        .meals
        .iter()
        .filter(|m| params.get("startDate").is_none_or(|d| day_of(m) >= d.as_str()))
        .filter(|m| params.get("endDate").is_none_or(|d| day_of(m) <= d.as_str()))
        .filter(|m| {
            params
                .get("mealType")
                .is_none_or(|t| m["mealType"].as_str() == Some(t.as_str()))
        })
        .cloned()
        .collect();
    let total = meals.len();
    ok(json!({ "meals": meals, "total": total }))
}

async fn create_meal(State(db): State<Db>, Json(input): Json<Value>) -> Reply {
    log(&db, "POST /api/meals".to_string());
    let mut backend = db.lock().unwrap();
    backend.next_id += 1;
    let meal = json!({
        "id": format!("cm{}", backend.next_id),
        "name": input["name"],
        "description": input.get("description").cloned().unwrap_or(Value::Null),
        "mealType": input["mealType"],
        "date": format!("{}T00:00:00.000Z", input["date"].as_str().unwrap_or_default()),
        "createdAt": "2026-01-11T07:30:00.000Z",
        "ratings": []
    });
    backend.meals.push(meal.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "meal": meal } })),
    )
}

async fn get_meal(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    log(&db, format!("GET /api/meals/{id}"));
    let backend = db.lock().unwrap();
    backend
        .meals
        .iter()
        .find(|m| m["id"] == id.as_str())
        .map_or_else(|| not_found("Meal"), |m| ok(json!({ "meal": m })))
}

async fn delete_meal(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    log(&db, format!("DELETE /api/meals/{id}"));
    let mut backend = db.lock().unwrap();
    let before = backend.meals.len();
    backend.meals.retain(|m| m["id"] != id.as_str());
    if backend.meals.len() == before {
        return not_found("Meal");
    }
    ok(json!({ "message": "Meal deleted successfully" }))
}

async fn list_ratings(State(db): State<Db>, Query(params): Query<HashMap<String, String>>) -> Reply {
    let meal_id = params.get("mealId").cloned().unwrap_or_default();
    log(&db, format!("GET /api/ratings?mealId={meal_id}"));
    let backend = db.lock().unwrap();
    let ratings: Vec<&Value> = backend
        .ratings
        .iter()
        .filter(|r| r["mealId"] == meal_id.as_str())
        .collect();
    let count = ratings.len();
    let sum: f64 = ratings.iter().filter_map(|r| r["rating"].as_f64()).sum();
    let average = if count == 0 { 0.0 } else { sum / count as f64 };
    ok(json!({ "ratings": ratings, "average": average, "count": count }))
}

async fn create_rating(State(db): State<Db>, Json(input): Json<Value>) -> Reply {
    log(&db, "POST /api/ratings".to_string());
    let mut backend = db.lock().unwrap();
    let rating = json!({
        "id": format!("r{}", backend.ratings.len() + 1),
        "mealId": input["mealId"],
        "rating": input["rating"],
        "comment": input.get("comment").cloned().unwrap_or(Value::Null),
        "createdAt": "2026-01-11T08:00:00.000Z"
    });
    backend.ratings.push(rating.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "rating": rating } })),
    )
}

async fn get_recommendations(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let meal_type = params.get("mealType").cloned().unwrap_or_default();
    let date = params.get("date").cloned().unwrap_or_default();
    log(&db, format!("GET /api/recommendations?mealType={meal_type}&date={date}"));
    ok(json!({
        "recommendations": [recommendation("Phở bò"), recommendation("Bún chả")],
        "context": {},
        "generatedAt": "2026-01-11T07:00:00.000Z"
    }))
}

async fn refresh_recommendations(State(db): State<Db>, Json(input): Json<Value>) -> Reply {
    log(&db, format!("POST /api/recommendations/refresh {input}"));
    let round = {
        let mut backend = db.lock().unwrap();
        backend.refreshes += 1;
        backend.refreshes
    };
    ok(json!({
        "recommendations": [
            recommendation(&format!("Cơm gà #{round}")),
            recommendation("Canh chua")
        ],
        "context": { "weather": { "condition": "Clouds", "temperature": 18.5 } },
        "generatedAt": "2026-01-11T07:05:00.000Z"
    }))
}

async fn weather(State(db): State<Db>) -> Reply {
    log(&db, "GET /api/weather".to_string());
    ok(json!({
        "weather": {
            "temp": 18.5,
            "condition": "Clouds",
            "description": "mây u ám",
            "icon": "04d",
            "humidity": 82,
            "windSpeed": 3.1,
            "location": "Hà Nội",
            "fetchedAt": "2026-01-11T07:00:00.000Z"
        }
    }))
}

pub fn backend_router(db: Db) -> Router {
    Router::new()
        .route("/api/meals", get(list_meals).post(create_meal))
        .route("/api/meals/{id}", get(get_meal).delete(delete_meal))
        .route("/api/ratings", get(list_ratings).post(create_rating))
        .route("/api/recommendations", get(get_recommendations))
        .route("/api/recommendations/refresh", post(refresh_recommendations))
        .route("/api/weather", get(weather))
        .with_state(db)
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn spawn_backend() -> (Db, String) {
    let db = Db::default();
    let base_url = serve(backend_router(db.clone())).await;
    (db, base_url)
}

pub fn config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.request_timeout_seconds = 5;
    config.cache.retry_delay_ms = 0;
    config
}
