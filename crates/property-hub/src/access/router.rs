use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::guard::{evaluate, AccessRequirement, GuardDecision};
use crate::hub::PropertyHub;

#[derive(Debug, Deserialize)]
pub(crate) struct NavigationQuery {
    pub(crate) path: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NavigationResponse {
    pub(crate) route: &'static str,
    pub(crate) path: String,
    pub(crate) requirement: AccessRequirement,
    #[serde(flatten)]
    pub(crate) decision: GuardDecision,
}

pub fn navigation_router() -> Router<PropertyHub> {
    Router::new().route("/api/v1/navigation", get(navigation_handler))
}

/// Reports the guard decision for a client-side page, using the caller's session if any.
pub(crate) async fn navigation_handler(
    State(hub): State<PropertyHub>,
    headers: HeaderMap,
    Query(query): Query<NavigationQuery>,
) -> Response {
    let Some(route) = hub.navigation.resolve(&query.path) else {
        let payload = json!({
            "error": "page not found",
            "path": query.path,
        });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    let state = hub.sessions.resolve_headers(&headers);
    let decision = evaluate(&state, &route.requirement, &query.path);

    let body = NavigationResponse {
        route: route.name,
        path: query.path,
        requirement: route.requirement,
        decision,
    };
    (StatusCode::OK, Json(body)).into_response()
}
