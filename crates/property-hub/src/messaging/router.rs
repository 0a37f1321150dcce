use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use super::domain::{MessageDraft, MessageId};
use crate::access::{enforce, AccessGate};
use crate::accounts::domain::CurrentUser;
use crate::hub::PropertyHub;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ConversationQuery {
    #[serde(default)]
    pub(crate) search: Option<String>,
}

/// Messaging endpoints; every route requires a signed-in caller.
pub fn messages_router(authenticated: AccessGate) -> Router<PropertyHub> {
    Router::new()
        .route("/api/v1/messages", get(inbox_handler).post(send_handler))
        .route("/api/v1/messages/conversations", get(conversations_handler))
        .route("/api/v1/messages/:message_id/read", post(mark_read_handler))
        .route_layer(from_fn_with_state(authenticated, enforce))
}

pub(crate) async fn inbox_handler(
    State(hub): State<PropertyHub>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    match hub.messaging.inbox(&user) {
        Ok(messages) => (StatusCode::OK, Json(messages)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn send_handler(
    State(hub): State<PropertyHub>,
    Extension(user): Extension<CurrentUser>,
    Json(draft): Json<MessageDraft>,
) -> Response {
    match hub.messaging.send(&user, draft) {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn conversations_handler(
    State(hub): State<PropertyHub>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ConversationQuery>,
) -> Response {
    match hub.messaging.conversations(&user, query.search.as_deref()) {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn mark_read_handler(
    State(hub): State<PropertyHub>,
    Extension(user): Extension<CurrentUser>,
    Path(message_id): Path<String>,
) -> Response {
    match hub.messaging.mark_read(&user, &MessageId(message_id)) {
        Ok(message) => (StatusCode::OK, Json(message)).into_response(),
        Err(err) => err.into_response(),
    }
}
