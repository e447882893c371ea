use uuid::Uuid;

use super::view::NavTarget;

/// Identity context owned by the auth layer and handed to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    pub user_id: Option<Uuid>,
    pub is_loading: bool,
}

impl Session {
    pub fn resolved(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            is_loading: false,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Identity is still being resolved by the auth layer.
    pub fn loading() -> Self {
        Self {
            user_id: None,
            is_loading: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Pending,
    Redirect(NavTarget),
    Proceed(Uuid),
}

/// Guard for signed-in pages: wait while loading, send anonymous users home.
pub fn gate(session: &Session) -> Gate {
    match (session.is_loading, session.user_id) {
        (true, _) => Gate::Pending,
        (false, None) => Gate::Redirect(NavTarget::Home),
        (false, Some(id)) => Gate::Proceed(id),
    }
}
