use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::guard::{evaluate, AccessRequirement, GuardDecision};
use super::session::SessionResolver;

/// Middleware state pairing the session resolver with one access requirement.
#[derive(Clone)]
pub struct AccessGate {
    sessions: Arc<SessionResolver>,
    requirement: AccessRequirement,
}

impl AccessGate {
    pub fn new(sessions: Arc<SessionResolver>, requirement: AccessRequirement) -> Self {
        Self {
            sessions,
            requirement,
        }
    }
}

/// Runs the access guard for the request. Allowed requests carry the resolved
/// `SessionState` and, when provisioned, the `CurrentUser` as extensions.
pub async fn enforce(State(gate): State<AccessGate>, mut request: Request, next: Next) -> Response {
    let state = gate.sessions.resolve_headers(request.headers());
    let requested = request
        .uri()
        .path_and_query()
        .map(|value| value.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    match evaluate(&state, &gate.requirement, &requested) {
        GuardDecision::RenderChildren => {
            if let Some(user) = state.current_user() {
                request.extensions_mut().insert(user);
            }
            request.extensions_mut().insert(state);
            next.run(request).await
        }
        denied => denial_response(denied),
    }
}

/// HTTP rendering of a guard decision that stopped the request.
pub fn denial_response(decision: GuardDecision) -> Response {
    match decision {
        GuardDecision::RenderChildren => StatusCode::NO_CONTENT.into_response(),
        GuardDecision::RedirectToLogin { login_path, from } => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "authentication required",
                "decision": "redirect_to_login",
                "login_path": login_path,
                "from": from,
            })),
        )
            .into_response(),
        GuardDecision::ShowLoading => {
            let mut response = (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": "session is still resolving",
                    "decision": "show_loading",
                })),
            )
                .into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
            response
        }
        GuardDecision::ShowProfilePending => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "profile is still being set up",
                "decision": "show_profile_pending",
            })),
        )
            .into_response(),
        GuardDecision::ShowAccessDenied => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "You don't have permission to access this page.",
                "decision": "show_access_denied",
            })),
        )
            .into_response(),
    }
}
