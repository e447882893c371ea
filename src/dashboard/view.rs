use serde::Serialize;

use super::aggregator::DashboardSnapshot;

/// Logical navigation targets. URL construction belongs to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavTarget {
    Home,
    Onboarding,
    Profile,
    LogMeal,
    Goals,
}

impl NavTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            NavTarget::Home => "home",
            NavTarget::Onboarding => "onboarding",
            NavTarget::Profile => "profile",
            NavTarget::LogMeal => "log-meal",
            NavTarget::Goals => "goals",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    OnboardingIncomplete,
    NoData,
    Ready(DashboardSnapshot),
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Loading => "loading",
            ViewState::OnboardingIncomplete => "onboarding_incomplete",
            ViewState::NoData => "no_data",
            ViewState::Ready(_) => "ready",
        }
    }

    pub fn actions(&self) -> &'static [NavTarget] {
        match self {
            ViewState::Loading => &[],
            ViewState::OnboardingIncomplete => &[NavTarget::Onboarding, NavTarget::Profile],
            ViewState::NoData => &[NavTarget::LogMeal, NavTarget::Goals],
            ViewState::Ready(_) => &[NavTarget::LogMeal, NavTarget::Goals, NavTarget::Profile],
        }
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match self {
            ViewState::Ready(s) => Some(s),
            _ => None,
        }
    }
}

/// Picks the active view. Loading wins, then onboarding, then data presence.
pub fn select(
    loading: bool,
    onboarding_complete: bool,
    snapshot: Option<DashboardSnapshot>,
) -> ViewState {
    if loading {
        return ViewState::Loading;
    }
    if !onboarding_complete {
        return ViewState::OnboardingIncomplete;
    }
    match snapshot {
        Some(s) => ViewState::Ready(s),
        None => ViewState::NoData,
    }
}

/// Transient toast shown when the dashboard degraded because of a failed read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
    pub status: &'static str,
    pub duration_ms: u32,
    pub closable: bool,
}

impl Notice {
    pub fn load_failed() -> Self {
        Self {
            title: "Error",
            description: "Failed to load dashboard data. Please try again.",
            status: "error",
            duration_ms: 5000,
            closable: true,
        }
    }
}
