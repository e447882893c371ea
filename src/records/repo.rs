use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{
    Collection, Goals, MealLogRecord, NutritionLogRecord, Profile, RecordGateway, StoreError,
};

#[derive(Clone)]
pub struct PgRecordGateway {
    db: PgPool,
}

impl PgRecordGateway {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Pool and socket failures mean the store is unreachable; anything else is a bad query.
fn query_failed(collection: Collection) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |source| match source {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable {
                collection,
                message: source.to_string(),
            }
        }
        source => StoreError::Query { collection, source },
    }
}

#[async_trait]
impl RecordGateway for PgRecordGateway {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row = sqlx::query_as::<_, Profile>(
            r#"
            SELECT user_id, full_name, weight_kg, height_cm, target_weight, goal_type,
                   activity_level
              FROM user_profiles
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(query_failed(Collection::Profiles))?;
        debug!(%user_id, found = row.is_some(), "profile fetched");
        Ok(row)
    }

    async fn fetch_goals(&self, user_id: Uuid) -> Result<Option<Goals>, StoreError> {
        let row = sqlx::query_as::<_, Goals>(
            r#"
            SELECT target_calories, target_protein_ratio, target_carbs_ratio,
                   target_fat_ratio, target_weight_kg
              FROM user_goals
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(query_failed(Collection::Goals))?;
        Ok(row)
    }

    async fn list_meal_logs(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MealLogRecord>, StoreError> {
        let rows = sqlx::query_as::<_, MealLogRecord>(
            r#"
            SELECT total_calories, protein, carbs, fat, created_at
              FROM meal_logs
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .map_err(query_failed(Collection::MealLogs))?;
        Ok(rows)
    }

    async fn list_nutrition_logs(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NutritionLogRecord>, StoreError> {
        let rows = sqlx::query_as::<_, NutritionLogRecord>(
            r#"
            SELECT date, calories, protein, carbs, fat, fiber
              FROM nutrition_logs
             WHERE user_id = $1
             ORDER BY date DESC
             LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await
        .map_err(query_failed(Collection::NutritionLogs))?;
        Ok(rows)
    }
}
