use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::service::{AccountError, SignInRequest, SignUpRequest};
use crate::access::{bearer_token, enforce, AccessGate};
use crate::hub::PropertyHub;

pub fn auth_router(authenticated: AccessGate) -> Router<PropertyHub> {
    let session_routes = Router::new()
        .route("/api/v1/auth/session", get(session_handler))
        .route("/api/v1/auth/sign-out", post(sign_out_handler))
        .route_layer(from_fn_with_state(authenticated, enforce));

    Router::new()
        .route("/api/v1/auth/sign-up", post(sign_up_handler))
        .route("/api/v1/auth/sign-in", post(sign_in_handler))
        .merge(session_routes)
}

pub(crate) async fn sign_up_handler(
    State(hub): State<PropertyHub>,
    Json(request): Json<SignUpRequest>,
) -> Response {
    match hub.accounts.sign_up(request) {
        Ok(grant) => (StatusCode::CREATED, Json(grant)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn sign_in_handler(
    State(hub): State<PropertyHub>,
    Json(request): Json<SignInRequest>,
) -> Response {
    match hub.accounts.sign_in(request) {
        Ok(grant) => (StatusCode::OK, Json(grant)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn session_handler(State(hub): State<PropertyHub>, headers: HeaderMap) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    match hub.accounts.current(&token) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => account_error_response(err),
    }
}

pub(crate) async fn sign_out_handler(State(hub): State<PropertyHub>, headers: HeaderMap) -> Response {
    let Some(token) = bearer_token(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    match hub.accounts.sign_out(&token) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => account_error_response(err),
    }
}

fn account_error_response(err: AccountError) -> Response {
    let payload = json!({
        "error": err.to_string(),
    });
    (err.status_code(), Json(payload)).into_response()
}
