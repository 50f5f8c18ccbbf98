use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::cache::{
    Collection, Mutation, QueryCache, QueryKey, QueryOptions, Record, Transaction, committed,
    confirm, fetch_query, mutation,
};
use crate::clients::{ApiError, MealApi};
use crate::domain::MealId;
use crate::models::{CreateRatingInput, Rating, RatingList};

pub mod keys {
    use crate::cache::QueryKey;
    use crate::domain::MealId;

    #[must_use]
    pub fn all() -> QueryKey {
        QueryKey::root("ratings")
    }

    #[must_use]
    pub fn details() -> QueryKey {
        all().join("detail")
    }

    /// Ratings of one meal.
    #[must_use]
    pub fn detail(meal_id: &MealId) -> QueryKey {
        details().join(meal_id.as_str())
    }
}

/// A meal's ratings with the aggregate the server computed, or the one
/// recomputed locally while a new rating is pending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub ratings: Collection<Rating>,
    pub average: f64,
    pub count: u32,
}

impl RatingSummary {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            ratings: Vec::new(),
            average: 0.0,
            count: 0,
        }
    }

    #[must_use]
    pub fn from_list(list: RatingList) -> Self {
        Self {
            ratings: committed(list.ratings),
            average: list.average,
            count: list.count,
        }
    }

    /// Appends `record` and recomputes the aggregate from all items.
    #[must_use]
    pub fn with_rating(&self, record: Record<Rating>) -> Self {
        let mut ratings = self.ratings.clone();
        ratings.push(record);
        let count = u32::try_from(ratings.len()).unwrap_or(u32::MAX);
        let sum: u32 = ratings.iter().map(|r| u32::from(r.value().rating)).sum();
        let average = if count == 0 {
            0.0
        } else {
            f64::from(sum) / f64::from(count)
        };
        Self {
            ratings,
            average,
            count,
        }
    }
}

#[derive(Clone)]
pub struct RatingService {
    api: Arc<dyn MealApi>,
    cache: QueryCache,
    options: QueryOptions,
}

impl RatingService {
    #[must_use]
    pub fn new(api: Arc<dyn MealApi>, cache: QueryCache, options: QueryOptions) -> Self {
        Self {
            api,
            cache,
            options,
        }
    }

    /// Ratings of `meal_id`; an empty summary without a request when the id
    /// is empty.
    pub async fn for_meal(&self, meal_id: &MealId) -> Result<RatingSummary, ApiError> {
        if meal_id.is_empty() {
            return Ok(RatingSummary::empty());
        }
        fetch_query(&self.cache, &keys::detail(meal_id), &self.options, || async {
            self.api.get_ratings(meal_id).await.map(RatingSummary::from_list)
        })
        .await
    }

    pub async fn create(&self, input: CreateRatingInput) -> Result<Rating, ApiError> {
        mutation::run(&self.cache, self.api.as_ref(), &CreateRating { input }).await
    }
}

pub struct CreateRating {
    pub input: CreateRatingInput,
}

#[async_trait]
impl Mutation for CreateRating {
    type Output = Rating;

    fn name(&self) -> &'static str {
        "create_rating"
    }

    fn cancel_keys(&self) -> Vec<QueryKey> {
        vec![keys::detail(&self.input.meal_id)]
    }

    async fn apply_optimistic(&self, txn: &mut Transaction) {
        let pending = Record::pending(txn.id(), Rating::placeholder(&self.input, Utc::now()));
        txn.patch::<RatingSummary, _>(&keys::detail(&self.input.meal_id), |summary| {
            summary.with_rating(pending)
        })
        .await;
    }

    async fn execute(&self, api: &dyn MealApi) -> Result<Rating, ApiError> {
        api.create_rating(&self.input).await
    }

    async fn reconcile(&self, txn: &mut Transaction, rating: &Rating) {
        let id = txn.id();
        txn.reconcile::<RatingSummary, _>(&keys::detail(&self.input.meal_id), |summary| {
            RatingSummary {
                ratings: confirm(&summary.ratings, id, rating),
                ..summary.clone()
            }
        })
        .await;
    }

    /// Meals embed their ratings, so the graph carries this on to `meals`.
    fn invalidate_keys(&self, _output: Option<&Rating>) -> Vec<QueryKey> {
        vec![keys::detail(&self.input.meal_id)]
    }
}
