use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::cache::{
    Collection, Mutation, QueryCache, QueryOptions, Record, Transaction, committed,
    confirm, fetch_query, mutation,
};
use crate::clients::{ApiError, MealApi};
use crate::domain::MealId;
use crate::models::{CreateMealInput, Meal, MealsQuery, UpdateMealInput};

/// Cache keys for meal queries.
pub mod keys {
    use chrono::NaiveDate;

    use crate::cache::QueryKey;
    use crate::domain::MealId;
    use crate::models::MealsQuery;

    #[must_use]
    pub fn all() -> QueryKey {
        QueryKey::root("meals")
    }

    #[must_use]
    pub fn lists() -> QueryKey {
        all().join("list")
    }

    #[must_use]
    pub fn list(filters: &MealsQuery) -> QueryKey {
        lists().with_params(filters)
    }

    #[must_use]
    pub fn details() -> QueryKey {
        all().join("detail")
    }

    #[must_use]
    pub fn detail(id: &MealId) -> QueryKey {
        details().join(id.as_str())
    }

    #[must_use]
    pub fn by_dates() -> QueryKey {
        all().join("byDate")
    }

    /// The day bucket the dashboard reads.
    #[must_use]
    pub fn by_date(day: NaiveDate) -> QueryKey {
        by_dates().join(day.format("%Y-%m-%d").to_string())
    }
}

/// Meal queries and mutations over the shared cache.
#[derive(Clone)]
pub struct MealService {
    api: Arc<dyn MealApi>,
    cache: QueryCache,
    options: QueryOptions,
}

impl MealService {
    #[must_use]
    pub fn new(api: Arc<dyn MealApi>, cache: QueryCache, options: QueryOptions) -> Self {
        Self {
            api,
            cache,
            options,
        }
    }

    /// Meals matching `filters`, in server order.
    pub async fn list(&self, filters: &MealsQuery) -> Result<Collection<Meal>, ApiError> {
        fetch_query(&self.cache, &keys::list(filters), &self.options, || async {
            self.api.get_meals(filters).await.map(|list| committed(list.meals))
        })
        .await
    }

    pub async fn by_date(&self, day: NaiveDate) -> Result<Collection<Meal>, ApiError> {
        let filters = MealsQuery::for_day(day);
        fetch_query(&self.cache, &keys::by_date(day), &self.options, || async {
            self.api
                .get_meals(&filters)
                .await
                .map(|list| committed(list.meals.into_iter().filter(|m| m.date == day)))
        })
        .await
    }

    /// A single meal; `None` without a request when `id` is empty.
    pub async fn detail(&self, id: &MealId) -> Result<Option<Meal>, ApiError> {
        if id.is_empty() {
            return Ok(None);
        }
        fetch_query(&self.cache, &keys::detail(id), &self.options, || async {
            self.api.get_meal(id).await
        })
        .await
        .map(Some)
    }

    pub async fn create(&self, input: CreateMealInput) -> Result<Meal, ApiError> {
        mutation::run(&self.cache, self.api.as_ref(), &CreateMeal { input }).await
    }

    /// Applies `changes` to `meal`, moving it between day buckets when the
    /// date changes.
    pub async fn update(&self, meal: &Meal, changes: UpdateMealInput) -> Result<Meal, ApiError> {
        let mutation = UpdateMeal {
            meal: meal.clone(),
            changes,
        };
        mutation::run(&self.cache, self.api.as_ref(), &mutation).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete(&self, meal: &Meal) -> Result<String, ApiError> {
        let mutation = DeleteMeal { meal: meal.clone() };
        mutation::run(&self.cache, self.api.as_ref(), &mutation).await
    }
}

fn replace_meal(items: &[Record<Meal>], id: &MealId, replacement: Record<Meal>) -> Collection<Meal> {
    items
        .iter()
        .map(|record| {
            if &record.value().id == id && !record.is_pending() {
                replacement.clone()
            } else {
                record.clone()
            }
        })
        .collect()
}

fn without_meal(items: &[Record<Meal>], id: &MealId) -> Collection<Meal> {
    items
        .iter()
        .filter(|record| record.is_pending() || &record.value().id != id)
        .cloned()
        .collect()
}

pub struct CreateMeal {
    pub input: CreateMealInput,
}

#[async_trait]
impl Mutation for CreateMeal {
    type Output = Meal;

    fn name(&self) -> &'static str {
        "create_meal"
    }

    fn cancel_keys(&self) -> Vec<crate::cache::QueryKey> {
        vec![keys::by_date(self.input.date), keys::lists()]
    }

    async fn apply_optimistic(&self, txn: &mut Transaction) {
        let id = txn.id();
        let placeholder = Meal::placeholder(&self.input, Utc::now());
        txn.patch::<Collection<Meal>, _>(&keys::by_date(self.input.date), |items| {
            let mut next = items.to_vec();
            next.push(Record::pending(id, placeholder));
            next
        })
        .await;
    }

    async fn execute(&self, api: &dyn MealApi) -> Result<Meal, ApiError> {
        api.create_meal(&self.input).await
    }

    async fn reconcile(&self, txn: &mut Transaction, meal: &Meal) {
        let id = txn.id();
        txn.reconcile::<Collection<Meal>, _>(&keys::by_date(self.input.date), |items| {
            confirm(items, id, meal)
        })
        .await;
        debug!(meal = %meal.id, "Created meal reconciled into day bucket");
    }

    fn invalidate_keys(&self, _output: Option<&Meal>) -> Vec<crate::cache::QueryKey> {
        vec![keys::lists(), keys::by_date(self.input.date)]
    }
}

pub struct UpdateMeal {
    pub meal: Meal,
    pub changes: UpdateMealInput,
}

impl UpdateMeal {
    fn new_date(&self) -> NaiveDate {
        self.changes.date.unwrap_or(self.meal.date)
    }

    fn touched_days(&self) -> Vec<NaiveDate> {
        let mut days = vec![self.meal.date];
        if self.new_date() != self.meal.date {
            days.push(self.new_date());
        }
        days
    }
}

#[async_trait]
impl Mutation for UpdateMeal {
    type Output = Meal;

    fn name(&self) -> &'static str {
        "update_meal"
    }

    fn cancel_keys(&self) -> Vec<crate::cache::QueryKey> {
        let mut keys: Vec<_> = self.touched_days().into_iter().map(keys::by_date).collect();
        keys.push(keys::detail(&self.meal.id));
        keys.push(keys::lists());
        keys
    }

    async fn apply_optimistic(&self, txn: &mut Transaction) {
        let id = txn.id();
        let merged = self.meal.merged(&self.changes);
        let meal_id = &self.meal.id;

        if self.new_date() == self.meal.date {
            let pending = Record::pending(id, merged.clone());
            txn.patch::<Collection<Meal>, _>(&keys::by_date(self.meal.date), |items| {
                replace_meal(items, meal_id, pending)
            })
            .await;
        } else {
            txn.patch::<Collection<Meal>, _>(&keys::by_date(self.meal.date), |items| {
                without_meal(items, meal_id)
            })
            .await;
            let moved = Record::pending(id, merged.clone());
            txn.patch::<Collection<Meal>, _>(&keys::by_date(self.new_date()), |items| {
                let mut next = items.to_vec();
                next.push(moved);
                next
            })
            .await;
        }

        let pending = Record::pending(id, merged.clone());
        txn.patch_all::<Collection<Meal>, _>(&keys::lists(), |items| {
            replace_meal(items, meal_id, pending.clone())
        })
        .await;
        txn.patch::<Meal, _>(&keys::detail(meal_id), |_| merged).await;
    }

    async fn execute(&self, api: &dyn MealApi) -> Result<Meal, ApiError> {
        api.update_meal(&self.meal.id, &self.changes).await
    }

    async fn reconcile(&self, txn: &mut Transaction, meal: &Meal) {
        let id = txn.id();
        for day in self.touched_days() {
            txn.reconcile::<Collection<Meal>, _>(&keys::by_date(day), |items| {
                confirm(items, id, meal)
            })
            .await;
        }
        txn.reconcile_all::<Collection<Meal>, _>(&keys::lists(), |items| {
            confirm(items, id, meal)
        })
        .await;
        txn.reconcile::<Meal, _>(&keys::detail(&meal.id), |_| meal.clone())
            .await;
    }

    fn invalidate_keys(&self, output: Option<&Meal>) -> Vec<crate::cache::QueryKey> {
        let mut keys: Vec<_> = self.touched_days().into_iter().map(keys::by_date).collect();
        if let Some(meal) = output.filter(|m| !self.touched_days().contains(&m.date)) {
            keys.push(keys::by_date(meal.date));
        }
        keys.push(keys::detail(&self.meal.id));
        keys.push(keys::lists());
        keys
    }
}

pub struct DeleteMeal {
    pub meal: Meal,
}

#[async_trait]
impl Mutation for DeleteMeal {
    type Output = String;

    fn name(&self) -> &'static str {
        "delete_meal"
    }

    fn cancel_keys(&self) -> Vec<crate::cache::QueryKey> {
        vec![
            keys::by_date(self.meal.date),
            keys::detail(&self.meal.id),
            keys::lists(),
        ]
    }

    async fn apply_optimistic(&self, txn: &mut Transaction) {
        let meal_id = &self.meal.id;
        txn.patch::<Collection<Meal>, _>(&keys::by_date(self.meal.date), |items| {
            without_meal(items, meal_id)
        })
        .await;
        txn.patch_all::<Collection<Meal>, _>(&keys::lists(), |items| without_meal(items, meal_id))
            .await;
    }

    async fn execute(&self, api: &dyn MealApi) -> Result<String, ApiError> {
        api.delete_meal(&self.meal.id).await
    }

    fn invalidate_keys(&self, _output: Option<&String>) -> Vec<crate::cache::QueryKey> {
        vec![
            keys::detail(&self.meal.id),
            keys::by_date(self.meal.date),
            keys::lists(),
        ]
    }
}
