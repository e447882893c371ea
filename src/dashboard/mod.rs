pub mod aggregator;
mod dto;
pub mod handlers;
pub mod onboarding;
pub mod pipeline;
pub mod session;
pub mod view;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::dashboard_routes())
}
