use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use serde_json::Value;

use crate::access::session::{Identity, IdentityError, IdentityProvider, Session, SessionToken};
use crate::accounts::domain::{CurrentUser, Profile, ProfileId, Role, UserId};
use crate::accounts::repository::ProfileRepository;
use crate::accounts::service::SignInRequest;
use crate::config::ListingsConfig;
use crate::fixtures::catalog;
use crate::hub::{Backend, PropertyHub};
use crate::listings::domain::{Property, PropertyId, PropertyStatus};
use crate::listings::repository::PropertyRepository;
use crate::memory::{MemoryIdentityProvider, MemoryProfileRepository, MemoryPropertyRepository};
use crate::repository::RepositoryError;

pub(super) const ADMIN_EMAIL: &str = "admin@example.com";
pub(super) const ADMIN_PASSWORD: &str = "admin-pass";

pub(super) fn admin() -> CurrentUser {
    member("admin-1", "Site Admin", Role::Admin)
}

pub(super) fn member(id: &str, name: &str, role: Role) -> CurrentUser {
    let user_id = UserId(id.to_string());
    CurrentUser {
        user_id: user_id.clone(),
        email: format!("{id}@example.com"),
        profile: Profile::new(user_id, Some(name.to_string()), None, role),
    }
}

/// Catalog with listing "2" awaiting review.
pub(super) fn moderation_catalog() -> Vec<Property> {
    let mut listings = catalog();
    listings[1].status = PropertyStatus::Pending;
    listings
}

pub(super) fn memory_backend() -> Backend {
    Backend::in_memory(moderation_catalog())
}

pub(super) fn hub_with(backend: Backend) -> PropertyHub {
    PropertyHub::new(backend, &ListingsConfig::default())
}

/// Bootstraps the administrator account and returns a bearer token for it.
pub(super) fn admin_token(hub: &PropertyHub) -> String {
    hub.accounts
        .bootstrap_admin(ADMIN_EMAIL, ADMIN_PASSWORD, "Site Admin")
        .expect("admin bootstrapped");
    hub.accounts
        .sign_in(SignInRequest {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        })
        .expect("admin signs in")
        .token
        .0
}

pub(super) fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request builds")
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    payload: &Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(payload).expect("payload serializes")))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Reads succeed; every mutation fails as if the data store were down.
pub(super) struct ReadOnlyPropertyRepository {
    inner: MemoryPropertyRepository,
}

impl ReadOnlyPropertyRepository {
    pub(super) fn new(properties: Vec<Property>) -> Self {
        Self {
            inner: MemoryPropertyRepository::with_properties(properties),
        }
    }
}

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("data store offline".to_string())
}

impl PropertyRepository for ReadOnlyPropertyRepository {
    fn list(&self) -> Result<Vec<Property>, RepositoryError> {
        self.inner.list()
    }

    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn insert(&self, _property: Property) -> Result<Property, RepositoryError> {
        Err(offline())
    }

    fn update_status(
        &self,
        _id: &PropertyId,
        _status: PropertyStatus,
    ) -> Result<Property, RepositoryError> {
        Err(offline())
    }

    fn delete(&self, _id: &PropertyId) -> Result<(), RepositoryError> {
        Err(offline())
    }
}

/// Profile store whose inserts always fail.
#[derive(Default)]
pub(super) struct RejectingProfileRepository {
    inner: MemoryProfileRepository,
}

impl ProfileRepository for RejectingProfileRepository {
    fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        self.inner.list()
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        self.inner.find_by_user(user_id)
    }

    fn insert(&self, _profile: Profile) -> Result<Profile, RepositoryError> {
        Err(offline())
    }

    fn update_role(&self, id: &ProfileId, role: Role) -> Result<Profile, RepositoryError> {
        self.inner.update_role(id, role)
    }

    fn delete(&self, id: &ProfileId) -> Result<(), RepositoryError> {
        self.inner.delete(id)
    }
}

/// Identity service that creates accounts but refuses to delete them.
#[derive(Default)]
pub(super) struct UndeletableIdentities {
    pub(super) inner: MemoryIdentityProvider,
}

impl IdentityProvider for UndeletableIdentities {
    fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        self.inner.sign_up(email, password)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        self.inner.sign_in(email, password)
    }

    fn sign_out(&self, token: &SessionToken) -> Result<(), IdentityError> {
        self.inner.sign_out(token)
    }

    fn session(&self, token: &SessionToken) -> Result<Option<Identity>, IdentityError> {
        self.inner.session(token)
    }

    fn create_identity(&self, email: &str, password: &str) -> Result<UserId, IdentityError> {
        self.inner.create_identity(email, password)
    }

    fn delete_identity(&self, _user_id: &UserId) -> Result<(), IdentityError> {
        Err(IdentityError::Unavailable("admin API offline".to_string()))
    }
}

pub(super) fn backend_with(
    properties: Arc<dyn PropertyRepository>,
    profiles: Arc<dyn ProfileRepository>,
    identities: Arc<dyn IdentityProvider>,
) -> Backend {
    Backend {
        properties,
        profiles,
        identities,
        ..memory_backend()
    }
}
