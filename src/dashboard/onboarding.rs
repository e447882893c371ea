use tracing::{error, instrument};
use uuid::Uuid;

use crate::records::{Profile, RecordGateway, StoreError};

/// Profile columns that must all be filled before the dashboard unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    FullName,
    WeightKg,
    HeightCm,
    GoalType,
}

impl RequiredField {
    pub const ALL: [RequiredField; 4] = [
        RequiredField::FullName,
        RequiredField::WeightKg,
        RequiredField::HeightCm,
        RequiredField::GoalType,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RequiredField::FullName => "full_name",
            RequiredField::WeightKg => "weight_kg",
            RequiredField::HeightCm => "height_cm",
            RequiredField::GoalType => "goal_type",
        }
    }

    /// Null, empty text, zero and NaN all count as not filled in.
    pub fn is_filled(self, profile: &Profile) -> bool {
        match self {
            RequiredField::FullName => text_filled(&profile.full_name),
            RequiredField::WeightKg => number_filled(profile.weight_kg),
            RequiredField::HeightCm => number_filled(profile.height_cm),
            RequiredField::GoalType => text_filled(&profile.goal_type),
        }
    }
}

fn text_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

fn number_filled(value: Option<f64>) -> bool {
    value.is_some_and(|v| v != 0.0 && !v.is_nan())
}

pub fn is_complete(profile: &Profile) -> bool {
    RequiredField::ALL.iter().all(|f| f.is_filled(profile))
}

pub fn missing_fields(profile: &Profile) -> Vec<&'static str> {
    RequiredField::ALL
        .iter()
        .filter(|f| !f.is_filled(profile))
        .map(|f| f.name())
        .collect()
}

#[derive(Debug, thiserror::Error)]
#[error("profile fetch failed for user {user_id}")]
pub struct ProfileFetchError {
    pub user_id: Uuid,
    #[source]
    pub source: StoreError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Onboarding {
    Complete(Profile),
    /// `None` when the user has no profile row at all.
    Incomplete(Option<Profile>),
}

impl Onboarding {
    pub fn is_complete(&self) -> bool {
        matches!(self, Onboarding::Complete(_))
    }
}

#[instrument(skip(gateway))]
pub async fn evaluate(
    gateway: &dyn RecordGateway,
    user_id: Uuid,
) -> Result<Onboarding, ProfileFetchError> {
    let profile = gateway.fetch_profile(user_id).await.map_err(|source| {
        error!(%user_id, error = %source, "profile fetch failed");
        ProfileFetchError { user_id, source }
    })?;

    Ok(match profile {
        Some(p) if is_complete(&p) => Onboarding::Complete(p),
        Some(p) => {
            tracing::debug!(%user_id, missing = ?missing_fields(&p), "onboarding incomplete");
            Onboarding::Incomplete(Some(p))
        }
        None => Onboarding::Incomplete(None),
    })
}
