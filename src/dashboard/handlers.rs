use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{DashboardResponse, SignedOutResponse};
use super::pipeline::load;
use super::session::Session;
use crate::{auth::services::AuthUser, state::AppState};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[instrument(skip(state, identity))]
pub async fn get_dashboard(State(state): State<AppState>, identity: Option<AuthUser>) -> Response {
    let session = match identity {
        Some(AuthUser(user_id)) => Session::resolved(user_id),
        None => Session::anonymous(),
    };

    let outcome = load(state.records.as_ref(), &session).await;
    if let Some(target) = outcome.redirect {
        return (
            StatusCode::UNAUTHORIZED,
            Json(SignedOutResponse {
                error: "Sign in to view the dashboard",
                redirect: target,
            }),
        )
            .into_response();
    }

    info!(user_id = ?session.user_id, view = outcome.view.name(), "dashboard view selected");
    Json(DashboardResponse::from(&outcome)).into_response()
}

#[cfg(test)]
mod dashboard_http_tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::auth::services::sign_access;
    use crate::records::memory::MemoryRecordGateway;
    use crate::records::{Collection, Profile};

    async fn call(state: AppState, token: Option<String>) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().uri("/dashboard");
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let res = dashboard_routes()
            .with_state(state)
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn profile(user_id: Uuid) -> Profile {
        Profile {
            user_id,
            full_name: Some("A".into()),
            weight_kg: Some(70.0),
            height_cm: Some(170.0),
            goal_type: Some("lose".into()),
            ..Profile::default()
        }
    }

    #[tokio::test]
    async fn ready_view_for_onboarded_user_without_history() {
        let id = Uuid::new_v4();
        let state = AppState::fake().with_records(Arc::new(
            MemoryRecordGateway::new().with_profile(profile(id)),
        ));
        let token = sign_access(&state.config.jwt, id).unwrap();

        let (status, json) = call(state, Some(token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["view"], "ready");
        assert_eq!(json["snapshot"]["display_name"], "A");
        assert!(json["snapshot"]["goals"].is_null());
        assert_eq!(json["snapshot"]["meal_logs"], serde_json::json!([]));
        assert_eq!(json["actions"], serde_json::json!(["log-meal", "goals", "profile"]));
        assert!(json.get("notice").is_none());
    }

    #[tokio::test]
    async fn failed_read_degrades_with_notice() {
        let id = Uuid::new_v4();
        let state = AppState::fake().with_records(Arc::new(
            MemoryRecordGateway::new()
                .with_profile(profile(id))
                .failing(Collection::Goals),
        ));
        let token = sign_access(&state.config.jwt, id).unwrap();

        let (status, json) = call(state, Some(token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["view"], "no_data");
        assert_eq!(json["notice"]["title"], "Error");
        assert!(json.get("snapshot").is_none());
    }

    #[tokio::test]
    async fn missing_token_redirects_home() {
        let (status, json) = call(AppState::fake(), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["redirect"], "home");
    }
}
