use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failures of one relay call, each mapped to a fixed status and JSON shape.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The caller sent an unusable body.
    #[error("{0}")]
    Validation(String),

    /// The operator has not configured the outbound endpoint.
    #[error("onboarding webhook URL is not configured")]
    Configuration,

    /// The automation endpoint answered with a non-2xx status.
    #[error("onboarding webhook failed with status: {status}")]
    Upstream { status: u16, body: String },

    /// Network, DNS or timeout failure talking to the endpoint. Built via
    /// [`RelayError::transport`] so the endpoint URL never reaches the caller.
    #[error("onboarding webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("onboarding webhook returned invalid JSON: {0}")]
    Decode(String),

    #[error("{0}")]
    Internal(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl RelayError {
    pub fn transport(err: reqwest::Error) -> Self {
        RelayError::Transport(err.without_url())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            RelayError::Validation(msg) => {
                tracing::warn!(kind = "validation", error = %msg, "rejected onboarding event");
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            RelayError::Configuration => {
                tracing::error!(
                    kind = "configuration",
                    "N8N_ONBOARDING_WEBHOOK_URL is not set; cannot relay onboarding event"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Server configuration error: onboarding webhook URL missing." }),
                )
            }
            RelayError::Upstream { status, body } => {
                tracing::error!(kind = "upstream", %status, body = %body, "onboarding webhook returned an error");
                internal(&self)
            }
            RelayError::Transport(_) | RelayError::Decode(_) | RelayError::Internal(_) => {
                tracing::error!(kind = "upstream", error = %self, "onboarding relay failed");
                internal(&self)
            }
            RelayError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn internal(err: &RelayError) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Internal server error", "details": err.to_string() }),
    )
}
