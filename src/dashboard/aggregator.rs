use serde::Serialize;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::records::{
    Collection, Goals, MealLogRecord, NutritionLogRecord, Profile, RecordGateway, StoreError,
    LOG_WINDOW,
};

/// Everything the full dashboard renders, read in one round.
///
/// Only [`aggregate`] builds one, and only when every read succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    profile: Profile,
    goals: Option<Goals>,
    meal_logs: Vec<MealLogRecord>,
    nutrition_logs: Vec<NutritionLogRecord>,
}

impl DashboardSnapshot {
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn goals(&self) -> Option<&Goals> {
        self.goals.as_ref()
    }

    pub fn meal_logs(&self) -> &[MealLogRecord] {
        &self.meal_logs
    }

    pub fn nutrition_logs(&self) -> &[NutritionLogRecord] {
        &self.nutrition_logs
    }

    /// Newest daily summary, shown as today's overview.
    pub fn latest_nutrition(&self) -> Option<&NutritionLogRecord> {
        self.nutrition_logs.first()
    }

    pub fn display_name(&self) -> &str {
        self.profile.full_name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("dashboard aggregation failed on {collection}")]
pub struct AggregationError {
    pub collection: Collection,
    #[source]
    pub source: StoreError,
}

impl From<StoreError> for AggregationError {
    fn from(source: StoreError) -> Self {
        Self {
            collection: source.collection(),
            source,
        }
    }
}

/// Reads goals, meal logs and nutrition logs concurrently and waits for all three.
///
/// Failures are checked in goals, meal logs, nutrition logs order; the first one
/// wins and the other results are dropped.
#[instrument(skip(gateway, profile), fields(user_id = %profile.user_id))]
pub async fn aggregate(
    gateway: &dyn RecordGateway,
    profile: Profile,
) -> Result<DashboardSnapshot, AggregationError> {
    let user_id: Uuid = profile.user_id;
    let (goals, meal_logs, nutrition_logs) = tokio::join!(
        gateway.fetch_goals(user_id),
        gateway.list_meal_logs(user_id, LOG_WINDOW),
        gateway.list_nutrition_logs(user_id, LOG_WINDOW),
    );

    let settled = goals.and_then(|goals| {
        let meal_logs = meal_logs?;
        let nutrition_logs = nutrition_logs?;
        Ok((goals, meal_logs, nutrition_logs))
    });

    match settled {
        Ok((goals, meal_logs, nutrition_logs)) => {
            info!(
                meals = meal_logs.len(),
                days = nutrition_logs.len(),
                has_goals = goals.is_some(),
                "dashboard snapshot assembled"
            );
            Ok(DashboardSnapshot {
                profile,
                goals,
                meal_logs,
                nutrition_logs,
            })
        }
        Err(e) => {
            error!(collection = %e.collection(), error = %e, "dashboard aggregation failed");
            Err(e.into())
        }
    }
}
