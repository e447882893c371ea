use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use bytes::Bytes;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use super::dto::OnboardingEventRequest;
use super::errors::RelayError;
use super::forwarder::WebhookForwarder;
use crate::config::{CorsConfig, WebhookConfig};
use crate::state::AppState;

pub fn relay_routes() -> Router<AppState> {
    Router::new().route("/api/n8n/onboarding", any(onboarding_webhook))
}

/// Single entry point for every method: preflight, forward, or 405.
#[instrument(skip(state, headers, body))]
pub async fn onboarding_webhook(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let cors = &state.config.cors;
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());

    let mut response = if method == Method::OPTIONS {
        preflight(cors)
    } else {
        let result = if method == Method::POST {
            relay_onboarding(&state.config.webhook, state.forwarder.as_ref(), &body).await
        } else {
            Err(RelayError::MethodNotAllowed)
        };
        match result {
            Ok(data) => (StatusCode::OK, Json(data)).into_response(),
            Err(e) => e.into_response(),
        }
    };
    announce_origin(&mut response, cors, origin);
    response
}

/// Validates, applies defaults and forwards one onboarding event.
///
/// Validation runs before the configuration check, and neither touches the network.
pub async fn relay_onboarding(
    config: &WebhookConfig,
    forwarder: &dyn WebhookForwarder,
    body: &[u8],
) -> Result<Value, RelayError> {
    let request = OnboardingEventRequest::parse(body)?.validate()?;

    let url = config
        .onboarding_url
        .as_ref()
        .ok_or(RelayError::Configuration)?;

    let event = request.with_defaults(OffsetDateTime::now_utc())?;
    let data = forwarder.forward(url, &event).await?;
    info!(user_id = %event.user_id, "onboarding event relayed");
    Ok(data)
}

fn preflight(cors: &CorsConfig) -> Response {
    let mut response = StatusCode::OK.into_response();
    set_header(&mut response, header::ACCESS_CONTROL_ALLOW_METHODS, &cors.allow_methods);
    set_header(&mut response, header::ACCESS_CONTROL_ALLOW_HEADERS, &cors.allow_headers);
    set_header(
        &mut response,
        header::ACCESS_CONTROL_MAX_AGE,
        &cors.max_age_secs.to_string(),
    );
    response
}

fn announce_origin(response: &mut Response, cors: &CorsConfig, request_origin: Option<&str>) {
    if let Some(allowed) = cors.allow_origin_for(request_origin) {
        set_header(response, header::ACCESS_CONTROL_ALLOW_ORIGIN, allowed);
    }
    if cors.varies_by_origin() {
        response
            .headers_mut()
            .append(header::VARY, HeaderValue::from_static("origin"));
    }
}

fn set_header(response: &mut Response, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            response.headers_mut().insert(name, v);
        }
        Err(_) => warn!(header = %name, "skipping invalid cors header value"),
    }
}
