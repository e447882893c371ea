//! Read-only access to the per-user record collections behind the dashboard.

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod repo_types;

pub use repo::PgRecordGateway;
pub use repo_types::{Goals, MealLogRecord, NutritionLogRecord, Profile};

/// Newest-first window the dashboard reads from each log collection.
pub const LOG_WINDOW: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Profiles,
    Goals,
    MealLogs,
    NutritionLogs,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::Profiles => "user_profiles",
            Collection::Goals => "user_goals",
            Collection::MealLogs => "meal_logs",
            Collection::NutritionLogs => "nutrition_logs",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("query on {collection} failed: {source}")]
    Query {
        collection: Collection,
        #[source]
        source: sqlx::Error,
    },
    #[error("{collection} unavailable: {message}")]
    Unavailable {
        collection: Collection,
        message: String,
    },
}

impl StoreError {
    pub fn collection(&self) -> Collection {
        match self {
            StoreError::Query { collection, .. } | StoreError::Unavailable { collection, .. } => {
                *collection
            }
        }
    }
}

/// Equality-on-`user_id` queries over the four collections.
///
/// Zero matching rows is a successful `None` / empty result, never an error.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn fetch_goals(&self, user_id: Uuid) -> Result<Option<Goals>, StoreError>;
    /// Ordered by `created_at` descending.
    async fn list_meal_logs(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MealLogRecord>, StoreError>;
    /// Ordered by `date` descending.
    async fn list_nutrition_logs(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NutritionLogRecord>, StoreError>;
}
