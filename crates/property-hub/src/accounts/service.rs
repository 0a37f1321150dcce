use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::domain::{CurrentUser, Profile, Role, UserId};
use super::store::ProfileStore;
use crate::access::session::{IdentityError, IdentityProvider, Session, SessionToken};
use crate::repository::RepositoryError;

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Session handed back after sign-up or sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionGrant {
    pub token: SessionToken,
    pub user_id: UserId,
    pub email: String,
    pub profile: Option<Profile>,
    pub issued_at: DateTime<Utc>,
}

impl SessionGrant {
    fn new(session: Session, profile: Option<Profile>) -> Self {
        Self {
            token: session.token,
            user_id: session.identity.user_id,
            email: session.identity.email,
            profile,
            issued_at: session.issued_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AccountError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountError::Identity(IdentityError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            AccountError::Identity(IdentityError::EmailTaken(_))
            | AccountError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            AccountError::Identity(IdentityError::WeakPassword { .. })
            | AccountError::Identity(IdentityError::InvalidEmail(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AccountError::Identity(IdentityError::UnknownIdentity(_))
            | AccountError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            AccountError::Identity(IdentityError::Unavailable(_))
            | AccountError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

/// Sign-up, sign-in, and session lookup on top of the identity provider and profile store.
pub struct AccountService {
    identities: Arc<dyn IdentityProvider>,
    profiles: Arc<ProfileStore>,
}

impl AccountService {
    pub fn new(identities: Arc<dyn IdentityProvider>, profiles: Arc<ProfileStore>) -> Self {
        Self {
            identities,
            profiles,
        }
    }

    /// Creates the identity and its `user` profile. A failed profile insert removes the
    /// identity again so no account is left without a profile.
    pub fn sign_up(&self, request: SignUpRequest) -> Result<SessionGrant, AccountError> {
        let session = self.identities.sign_up(&request.email, &request.password)?;
        let user_id = session.identity.user_id.clone();
        let profile = Profile::new(user_id.clone(), request.full_name, request.phone, Role::User);

        match self.profiles.insert(profile) {
            Ok(profile) => {
                info!(user_id = %user_id, "account created");
                Ok(SessionGrant::new(session, Some(profile)))
            }
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "profile insert failed; removing identity");
                if let Err(cleanup) = self.identities.delete_identity(&user_id) {
                    error!(user_id = %user_id, error = %cleanup, "identity left without a profile");
                }
                Err(err.into())
            }
        }
    }

    /// Seeds an administrator account at startup, removing the identity again if the profile
    /// cannot be stored.
    pub fn bootstrap_admin(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Profile, AccountError> {
        let user_id = self.identities.create_identity(email, password)?;
        let profile = Profile::new(user_id.clone(), Some(full_name.to_string()), None, Role::Admin);

        match self.profiles.insert(profile) {
            Ok(profile) => {
                info!(user_id = %user_id, "administrator bootstrapped");
                Ok(profile)
            }
            Err(err) => {
                if let Err(cleanup) = self.identities.delete_identity(&user_id) {
                    error!(user_id = %user_id, error = %cleanup, "identity left without a profile");
                }
                Err(err.into())
            }
        }
    }

    pub fn sign_in(&self, request: SignInRequest) -> Result<SessionGrant, AccountError> {
        let session = match self.identities.sign_in(&request.email, &request.password) {
            Ok(session) => session,
            Err(err) => {
                info!(error = %err, "sign-in rejected");
                return Err(err.into());
            }
        };
        let profile = self.profiles.find_by_user(&session.identity.user_id)?;
        Ok(SessionGrant::new(session, profile))
    }

    pub fn sign_out(&self, token: &SessionToken) -> Result<(), AccountError> {
        self.identities.sign_out(token)?;
        Ok(())
    }

    /// Identity and profile behind a token. Unknown tokens are invalid credentials; an identity
    /// without a profile reports the profile as missing.
    pub fn current(&self, token: &SessionToken) -> Result<CurrentUser, AccountError> {
        let identity = self
            .identities
            .session(token)?
            .ok_or(IdentityError::InvalidCredentials)?;
        let profile = self
            .profiles
            .find_by_user(&identity.user_id)?
            .ok_or(RepositoryError::NotFound)?;

        Ok(CurrentUser {
            user_id: identity.user_id,
            email: identity.email,
            profile,
        })
    }
}
