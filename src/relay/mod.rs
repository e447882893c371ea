//! Stateless relay from onboarding events to the external automation webhook.

pub mod dto;
pub mod errors;
pub mod forwarder;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::relay_routes()
}
