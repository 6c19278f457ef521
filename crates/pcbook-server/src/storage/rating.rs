use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Running rating aggregate for one laptop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rating {
    pub count: u32,
    pub sum: f64,
}

impl Rating {
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }
}

/// Thread-safe (count, sum) aggregates keyed by laptop ID.
#[derive(Clone, Default)]
pub struct RatingStore {
    ratings: Arc<RwLock<HashMap<String, Rating>>>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one score and return the updated aggregate.
    ///
    /// The read-modify-write happens under a single write guard.
    pub async fn add(&self, laptop_id: &str, score: f64) -> Rating {
        let mut ratings = self.ratings.write().await;
        let rating = ratings.entry(laptop_id.to_string()).or_default();
        rating.count = rating.count.saturating_add(1);
        rating.sum += score;
        *rating
    }

    pub async fn get(&self, laptop_id: &str) -> Option<Rating> {
        self.ratings.read().await.get(laptop_id).copied()
    }
}
