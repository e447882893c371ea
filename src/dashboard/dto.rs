use serde::Serialize;

use super::aggregator::DashboardSnapshot;
use super::pipeline::DashboardOutcome;
use super::view::{NavTarget, Notice};
use crate::records::NutritionLogRecord;

#[derive(Debug, Serialize)]
pub struct ReadySnapshot<'a> {
    pub display_name: &'a str,
    pub latest_nutrition: Option<&'a NutritionLogRecord>,
    #[serde(flatten)]
    pub snapshot: &'a DashboardSnapshot,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse<'a> {
    pub view: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<ReadySnapshot<'a>>,
    pub actions: &'static [NavTarget],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'a Notice>,
}

impl<'a> From<&'a DashboardOutcome> for DashboardResponse<'a> {
    fn from(outcome: &'a DashboardOutcome) -> Self {
        Self {
            view: outcome.view.name(),
            snapshot: outcome.view.snapshot().map(|s| ReadySnapshot {
                display_name: s.display_name(),
                latest_nutrition: s.latest_nutrition(),
                snapshot: s,
            }),
            actions: outcome.view.actions(),
            notice: outcome.notice.as_ref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignedOutResponse {
    pub error: &'static str,
    pub redirect: NavTarget,
}
