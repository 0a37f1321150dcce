use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;

use super::catalog::CatalogError;
use super::domain::PropertyId;
use super::submission::PropertyDraft;
use super::view::ListingQuery;
use crate::access::{enforce, AccessGate};
use crate::accounts::domain::CurrentUser;
use crate::hub::PropertyHub;
use crate::repository::RepositoryError;

/// Browsing is public; submitting requires a signed-in caller.
pub fn listings_router(authenticated: AccessGate) -> Router<PropertyHub> {
    Router::new()
        .route(
            "/api/v1/properties",
            get(list_handler)
                .merge(post(submit_handler).route_layer(from_fn_with_state(authenticated, enforce))),
        )
        .route("/api/v1/properties/:property_id", get(detail_handler))
}

pub(crate) async fn list_handler(
    State(hub): State<PropertyHub>,
    Query(query): Query<ListingQuery>,
) -> Response {
    match hub.catalog.public_listings(&query) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => catalog_error_response(err),
    }
}

pub(crate) async fn detail_handler(
    State(hub): State<PropertyHub>,
    headers: HeaderMap,
    Path(property_id): Path<String>,
) -> Response {
    let viewer = hub.sessions.resolve_headers(&headers).current_user();
    let id = PropertyId(property_id);
    match hub.catalog.fetch(&id, viewer.as_ref()) {
        Ok(property) => (StatusCode::OK, Json(property)).into_response(),
        Err(err) => catalog_error_response(err),
    }
}

pub(crate) async fn submit_handler(
    State(hub): State<PropertyHub>,
    Extension(author): Extension<CurrentUser>,
    Json(draft): Json<PropertyDraft>,
) -> Response {
    match hub.catalog.submit(&author, draft) {
        Ok(property) => (StatusCode::CREATED, Json(property)).into_response(),
        Err(err) => catalog_error_response(err),
    }
}

fn catalog_error_response(err: CatalogError) -> Response {
    let status = match &err {
        CatalogError::Submission(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CatalogError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CatalogError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        CatalogError::Repository(RepositoryError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let message = match &err {
        CatalogError::Repository(RepositoryError::NotFound) => "property not found".to_string(),
        other => other.to_string(),
    };
    (status, Json(json!({ "error": message }))).into_response()
}
