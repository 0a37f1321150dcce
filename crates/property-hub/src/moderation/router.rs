use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Extension, Json, Router,
};

use super::dashboard::{AdminPropertyQuery, AdminUserQuery};
use super::service::{AgentDraft, Confirmation};
use crate::access::{enforce, AccessGate};
use crate::accounts::domain::{CurrentUser, ProfileId};
use crate::hub::PropertyHub;
use crate::listings::domain::PropertyId;
use crate::listings::submission::PropertyDraft;

/// Admin dashboard endpoints, all behind the admin role gate.
pub fn admin_router(admin: AccessGate) -> Router<PropertyHub> {
    Router::new()
        .route("/api/v1/admin/dashboard", get(dashboard_handler))
        .route(
            "/api/v1/admin/properties",
            get(properties_handler).post(create_property_handler),
        )
        .route(
            "/api/v1/admin/properties/:property_id",
            delete(delete_property_handler),
        )
        .route(
            "/api/v1/admin/properties/:property_id/approve",
            post(approve_handler),
        )
        .route(
            "/api/v1/admin/properties/:property_id/reject",
            post(reject_handler),
        )
        .route("/api/v1/admin/users", get(users_handler))
        .route("/api/v1/admin/users/:profile_id", delete(delete_user_handler))
        .route("/api/v1/admin/users/:profile_id/promote", post(promote_handler))
        .route("/api/v1/admin/agents", post(create_agent_handler))
        .route_layer(from_fn_with_state(admin, enforce))
}

pub(crate) async fn dashboard_handler(State(hub): State<PropertyHub>) -> Response {
    match hub.moderation.dashboard() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn properties_handler(
    State(hub): State<PropertyHub>,
    Query(query): Query<AdminPropertyQuery>,
) -> Response {
    match hub.moderation.properties(&query) {
        Ok(properties) => (StatusCode::OK, Json(properties)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_property_handler(
    State(hub): State<PropertyHub>,
    Extension(admin): Extension<CurrentUser>,
    Json(draft): Json<PropertyDraft>,
) -> Response {
    match hub.moderation.create_property(&admin, draft) {
        Ok(property) => (StatusCode::CREATED, Json(property)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn approve_handler(
    State(hub): State<PropertyHub>,
    Extension(admin): Extension<CurrentUser>,
    Path(property_id): Path<String>,
) -> Response {
    match hub
        .moderation
        .approve_property(&admin, &PropertyId(property_id))
    {
        Ok(property) => (StatusCode::OK, Json(property)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn reject_handler(
    State(hub): State<PropertyHub>,
    Extension(admin): Extension<CurrentUser>,
    Path(property_id): Path<String>,
) -> Response {
    match hub
        .moderation
        .reject_property(&admin, &PropertyId(property_id))
    {
        Ok(property) => (StatusCode::OK, Json(property)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_property_handler(
    State(hub): State<PropertyHub>,
    Extension(admin): Extension<CurrentUser>,
    Path(property_id): Path<String>,
    Query(confirmation): Query<Confirmation>,
) -> Response {
    match hub
        .moderation
        .delete_property(&admin, &PropertyId(property_id), confirmation)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn users_handler(
    State(hub): State<PropertyHub>,
    Query(query): Query<AdminUserQuery>,
) -> Response {
    match hub.moderation.users(query.search.as_deref()) {
        Ok(profiles) => (StatusCode::OK, Json(profiles)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn promote_handler(
    State(hub): State<PropertyHub>,
    Extension(admin): Extension<CurrentUser>,
    Path(profile_id): Path<String>,
) -> Response {
    match hub
        .moderation
        .promote_to_agent(&admin, &ProfileId(profile_id))
    {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_user_handler(
    State(hub): State<PropertyHub>,
    Extension(admin): Extension<CurrentUser>,
    Path(profile_id): Path<String>,
    Query(confirmation): Query<Confirmation>,
) -> Response {
    match hub
        .moderation
        .delete_user(&admin, &ProfileId(profile_id), confirmation)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_agent_handler(
    State(hub): State<PropertyHub>,
    Extension(admin): Extension<CurrentUser>,
    Json(draft): Json<AgentDraft>,
) -> Response {
    match hub.moderation.create_agent(&admin, draft) {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(err) => err.into_response(),
    }
}
