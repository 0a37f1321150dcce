use std::fmt;
use std::sync::Arc;

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::accounts::domain::{CurrentUser, Profile, UserId};
use crate::accounts::store::ProfileStore;

/// Opaque bearer token handed out by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub String);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: SessionToken,
    pub identity: Identity,
    pub issued_at: DateTime<Utc>,
}

/// Hosted authentication service boundary.
pub trait IdentityProvider: Send + Sync {
    fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;
    fn sign_out(&self, token: &SessionToken) -> Result<(), IdentityError>;
    /// Resolves a bearer token to its identity; `None` for unknown or revoked tokens.
    fn session(&self, token: &SessionToken) -> Result<Option<Identity>, IdentityError>;
    /// Privileged account creation used when an administrator onboards an agent.
    fn create_identity(&self, email: &str, password: &str) -> Result<UserId, IdentityError>;
    fn delete_identity(&self, user_id: &UserId) -> Result<(), IdentityError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("an account already exists for {0}")]
    EmailTaken(String),
    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("identity {0} not found")]
    UnknownIdentity(UserId),
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

/// Everything the access guard knows about the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Session or profile lookup has not settled yet.
    Resolving,
    Anonymous,
    Authenticated {
        identity: Identity,
        profile: Option<Profile>,
    },
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            SessionState::Authenticated { profile, .. } => profile.as_ref(),
            _ => None,
        }
    }

    /// Fully provisioned caller, if any.
    pub fn current_user(&self) -> Option<CurrentUser> {
        match self {
            SessionState::Authenticated {
                identity,
                profile: Some(profile),
            } => Some(CurrentUser {
                user_id: identity.user_id.clone(),
                email: identity.email.clone(),
                profile: profile.clone(),
            }),
            _ => None,
        }
    }
}

/// Turns a bearer token into a [`SessionState`].
///
/// Identity-service failures degrade to [`SessionState::Anonymous`]; a failed profile lookup
/// leaves the profile unloaded so the guard reports it as pending.
pub struct SessionResolver {
    identities: Arc<dyn IdentityProvider>,
    profiles: Arc<ProfileStore>,
}

impl SessionResolver {
    pub fn new(identities: Arc<dyn IdentityProvider>, profiles: Arc<ProfileStore>) -> Self {
        Self {
            identities,
            profiles,
        }
    }

    pub fn resolve(&self, token: Option<&SessionToken>) -> SessionState {
        let Some(token) = token else {
            return SessionState::Anonymous;
        };

        let identity = match self.identities.session(token) {
            Ok(Some(identity)) => identity,
            Ok(None) => return SessionState::Anonymous,
            Err(err) => {
                warn!(error = %err, "session lookup failed; treating caller as anonymous");
                return SessionState::Anonymous;
            }
        };

        let profile = match self.profiles.find_by_user(&identity.user_id) {
            Ok(profile) => profile,
            Err(err) => {
                warn!(error = %err, user_id = %identity.user_id, "profile lookup failed");
                None
            }
        };

        SessionState::Authenticated { identity, profile }
    }

    pub fn resolve_headers(&self, headers: &HeaderMap) -> SessionState {
        let token = bearer_token(headers);
        self.resolve(token.as_ref())
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| SessionToken(token.to_string()))
}
