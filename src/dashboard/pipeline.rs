use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::aggregator::aggregate;
use super::onboarding::{evaluate, Onboarding};
use super::session::{gate, Gate, Session};
use super::view::{select, NavTarget, Notice, ViewState};
use crate::records::RecordGateway;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOutcome {
    pub view: ViewState,
    pub notice: Option<Notice>,
    pub redirect: Option<NavTarget>,
}

impl DashboardOutcome {
    fn view(view: ViewState) -> Self {
        Self {
            view,
            notice: None,
            redirect: None,
        }
    }

    fn degraded(view: ViewState) -> Self {
        Self {
            view,
            notice: Some(Notice::load_failed()),
            redirect: None,
        }
    }
}

/// Evaluate onboarding, then aggregate only when it is complete.
///
/// Every failure degrades to a non-fatal view with a notice attached.
pub async fn load(gateway: &dyn RecordGateway, session: &Session) -> DashboardOutcome {
    let user_id = match gate(session) {
        Gate::Pending => return DashboardOutcome::view(ViewState::Loading),
        Gate::Redirect(target) => {
            return DashboardOutcome {
                view: ViewState::Loading,
                notice: None,
                redirect: Some(target),
            }
        }
        Gate::Proceed(id) => id,
    };

    let profile = match evaluate(gateway, user_id).await {
        Ok(Onboarding::Complete(profile)) => profile,
        Ok(Onboarding::Incomplete(_)) => {
            return DashboardOutcome::view(select(false, false, None));
        }
        Err(e) => {
            // rendered as incomplete onboarding, but logged as an outage
            warn!(%user_id, kind = "profile_fetch", error = %e, "showing onboarding view after fetch error");
            return DashboardOutcome::degraded(select(false, false, None));
        }
    };

    match aggregate(gateway, profile).await {
        Ok(snapshot) => DashboardOutcome::view(select(false, true, Some(snapshot))),
        Err(e) => {
            warn!(%user_id, kind = "aggregation", error = %e, "showing empty dashboard after fetch error");
            DashboardOutcome::degraded(select(false, true, None))
        }
    }
}

/// Holds the view for one consumer and drops results that belong to an older identity.
///
/// The HTTP handler is stateless and calls [`load`] directly. A long-lived
/// client embedding this crate drives one controller per screen instead,
/// feeding it every session change and calling [`teardown`](Self::teardown)
/// when the screen goes away.
pub struct DashboardController {
    gateway: Arc<dyn RecordGateway>,
    generation: AtomicU64,
    state: watch::Sender<ViewState>,
}

impl DashboardController {
    pub fn new(gateway: Arc<dyn RecordGateway>) -> Self {
        let (state, _) = watch::channel(ViewState::Loading);
        Self {
            gateway,
            generation: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Runs the pipeline for a new identity. Returns `None` when a later
    /// identity change or teardown made this run stale.
    pub async fn on_session(&self, session: Session) -> Option<DashboardOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(ViewState::Loading);

        let outcome = load(self.gateway.as_ref(), &session).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding dashboard result for stale identity");
            return None;
        }
        self.state.send_replace(outcome.view.clone());
        Some(outcome)
    }

    pub fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
