use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use uuid::Uuid;

use super::{
    Collection, Goals, MealLogRecord, NutritionLogRecord, Profile, RecordGateway, StoreError,
};

/// In-memory gateway with per-collection failure injection.
#[derive(Default)]
pub struct MemoryRecordGateway {
    profiles: Mutex<HashMap<Uuid, Profile>>,
    goals: Mutex<HashMap<Uuid, Goals>>,
    meal_logs: Mutex<HashMap<Uuid, Vec<MealLogRecord>>>,
    nutrition_logs: Mutex<HashMap<Uuid, Vec<NutritionLogRecord>>>,
    failing: Mutex<HashSet<Collection>>,
    profile_gate: Mutex<Option<Arc<Notify>>>,
    queries: AtomicUsize,
}

impl MemoryRecordGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        self.profiles.lock().unwrap().insert(profile.user_id, profile);
        self
    }

    pub fn with_goals(self, user_id: Uuid, goals: Goals) -> Self {
        self.goals.lock().unwrap().insert(user_id, goals);
        self
    }

    /// Stored in any order; reads sort newest first like the real store.
    pub fn with_meal_logs(self, user_id: Uuid, logs: Vec<MealLogRecord>) -> Self {
        self.meal_logs.lock().unwrap().insert(user_id, logs);
        self
    }

    pub fn with_nutrition_logs(self, user_id: Uuid, logs: Vec<NutritionLogRecord>) -> Self {
        self.nutrition_logs.lock().unwrap().insert(user_id, logs);
        self
    }

    pub fn failing(self, collection: Collection) -> Self {
        self.failing.lock().unwrap().insert(collection);
        self
    }

    /// Profile reads park until the returned handle is notified.
    pub fn hold_profile_reads(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.profile_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn check(&self, collection: Collection) -> Result<(), StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(&collection) {
            return Err(StoreError::Unavailable {
                collection,
                message: "connection reset".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RecordGateway for MemoryRecordGateway {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let gate = self.profile_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check(Collection::Profiles)?;
        Ok(self.profiles.lock().unwrap().get(&user_id).cloned())
    }

    async fn fetch_goals(&self, user_id: Uuid) -> Result<Option<Goals>, StoreError> {
        self.check(Collection::Goals)?;
        Ok(self.goals.lock().unwrap().get(&user_id).cloned())
    }

    async fn list_meal_logs(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MealLogRecord>, StoreError> {
        self.check(Collection::MealLogs)?;
        let mut rows = self
            .meal_logs
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn list_nutrition_logs(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<NutritionLogRecord>, StoreError> {
        self.check(Collection::NutritionLogs)?;
        let mut rows = self
            .nutrition_logs
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}
