use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use super::dashboard::{search_profiles, search_properties, AdminPropertyQuery, DashboardStats};
use crate::access::session::{IdentityError, IdentityProvider};
use crate::accounts::domain::{non_blank, CurrentUser, Profile, ProfileId, Role, UserId};
use crate::accounts::store::ProfileStore;
use crate::listings::domain::{Property, PropertyId, PropertyStatus};
use crate::listings::store::PropertyStore;
use crate::listings::submission::{PropertyDraft, SubmissionError, SubmissionPolicy};
use crate::repository::RepositoryError;

/// Explicit go-ahead for destructive actions, taken from `?confirm=true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(default)]
    pub confirm: bool,
}

impl Confirmation {
    pub const CONFIRMED: Confirmation = Confirmation { confirm: true };

    fn require(self) -> Result<(), ModerationError> {
        if self.confirm {
            Ok(())
        } else {
            Err(ModerationError::ConfirmationRequired)
        }
    }
}

/// Admin form for onboarding an agent with a temporary password.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentDraft {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("this action requires confirmation; repeat it with confirm=true")]
    ConfirmationRequired,
    #[error("agent full name is required")]
    MissingAgentName,
    #[error("profile already has role {0}")]
    AlreadyPrivileged(Role),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("agent profile could not be created ({cause}); identity {user_id} was removed")]
    AgentProfileRolledBack {
        user_id: UserId,
        cause: RepositoryError,
    },
    #[error(
        "agent profile could not be created ({cause}) and identity {user_id} could not be removed: {cleanup}"
    )]
    OrphanedIdentity {
        user_id: UserId,
        cause: RepositoryError,
        cleanup: IdentityError,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ModerationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ModerationError::ConfirmationRequired => StatusCode::PRECONDITION_REQUIRED,
            ModerationError::MissingAgentName
            | ModerationError::Submission(_)
            | ModerationError::Identity(IdentityError::WeakPassword { .. })
            | ModerationError::Identity(IdentityError::InvalidEmail(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ModerationError::AlreadyPrivileged(_)
            | ModerationError::Identity(IdentityError::EmailTaken(_))
            | ModerationError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            ModerationError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            ModerationError::Identity(IdentityError::Unavailable(_))
            | ModerationError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ModerationError::Identity(_)
            | ModerationError::AgentProfileRolledBack { .. }
            | ModerationError::OrphanedIdentity { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ModerationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ModerationError::Repository(RepositoryError::NotFound) => "record not found".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Administrator actions over listings and users.
///
/// Each mutation goes through the owning store, which re-fetches its snapshot on success. A
/// failed call leaves both the data store and the snapshot untouched.
pub struct ModerationService {
    properties: Arc<PropertyStore>,
    profiles: Arc<ProfileStore>,
    identities: Arc<dyn IdentityProvider>,
    policy: SubmissionPolicy,
}

impl ModerationService {
    pub fn new(
        properties: Arc<PropertyStore>,
        profiles: Arc<ProfileStore>,
        identities: Arc<dyn IdentityProvider>,
        policy: SubmissionPolicy,
    ) -> Self {
        Self {
            properties,
            profiles,
            identities,
            policy,
        }
    }

    pub fn approve_property(
        &self,
        admin: &CurrentUser,
        id: &PropertyId,
    ) -> Result<Property, ModerationError> {
        self.transition(admin, id, PropertyStatus::Active)
    }

    pub fn reject_property(
        &self,
        admin: &CurrentUser,
        id: &PropertyId,
    ) -> Result<Property, ModerationError> {
        self.transition(admin, id, PropertyStatus::Rejected)
    }

    fn transition(
        &self,
        admin: &CurrentUser,
        id: &PropertyId,
        status: PropertyStatus,
    ) -> Result<Property, ModerationError> {
        match self.properties.set_status(id, status) {
            Ok(property) => {
                info!(admin = %admin.user_id, property_id = %id, status = status.label(), "property moderated");
                Ok(property)
            }
            Err(err) => {
                warn!(admin = %admin.user_id, property_id = %id, error = %err, "property moderation failed");
                Err(err.into())
            }
        }
    }

    pub fn delete_property(
        &self,
        admin: &CurrentUser,
        id: &PropertyId,
        confirmation: Confirmation,
    ) -> Result<(), ModerationError> {
        confirmation.require()?;
        self.properties.delete(id)?;
        info!(admin = %admin.user_id, property_id = %id, "property deleted");
        Ok(())
    }

    /// Listing created from the dashboard; published immediately.
    pub fn create_property(
        &self,
        admin: &CurrentUser,
        draft: PropertyDraft,
    ) -> Result<Property, ModerationError> {
        let property = self.policy.prepare(draft, &admin.user_id, Role::Admin)?;
        let stored = self.properties.insert(property)?;
        info!(admin = %admin.user_id, property_id = %stored.id, "property created by admin");
        Ok(stored)
    }

    /// Grants the agent role to a regular user.
    pub fn promote_to_agent(
        &self,
        admin: &CurrentUser,
        id: &ProfileId,
    ) -> Result<Profile, ModerationError> {
        let profile = self.profiles.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        if profile.role != Role::User {
            return Err(ModerationError::AlreadyPrivileged(profile.role));
        }
        let promoted = self.profiles.update_role(id, Role::Agent)?;
        info!(admin = %admin.user_id, profile_id = %id, "user promoted to agent");
        Ok(promoted)
    }

    /// Removes the profile record. The identity itself is left with the identity service.
    pub fn delete_user(
        &self,
        admin: &CurrentUser,
        id: &ProfileId,
        confirmation: Confirmation,
    ) -> Result<(), ModerationError> {
        confirmation.require()?;
        self.profiles.delete(id)?;
        info!(admin = %admin.user_id, profile_id = %id, "user profile deleted");
        Ok(())
    }

    /// Creates the identity, then its agent profile. If the profile insert fails the identity
    /// is deleted again; a failed deletion is reported as an orphaned identity.
    pub fn create_agent(
        &self,
        admin: &CurrentUser,
        draft: AgentDraft,
    ) -> Result<Profile, ModerationError> {
        let full_name = non_blank(draft.full_name).ok_or(ModerationError::MissingAgentName)?;
        let user_id = self
            .identities
            .create_identity(draft.email.trim(), &draft.password)?;

        let profile = Profile::new(user_id.clone(), Some(full_name), draft.phone, Role::Agent);
        match self.profiles.insert(profile) {
            Ok(profile) => {
                info!(admin = %admin.user_id, user_id = %user_id, "agent created");
                Ok(profile)
            }
            Err(cause) => match self.identities.delete_identity(&user_id) {
                Ok(()) => {
                    warn!(user_id = %user_id, error = %cause, "agent profile failed; identity rolled back");
                    Err(ModerationError::AgentProfileRolledBack { user_id, cause })
                }
                Err(cleanup) => {
                    error!(user_id = %user_id, error = %cause, cleanup_error = %cleanup, "agent identity orphaned");
                    Err(ModerationError::OrphanedIdentity {
                        user_id,
                        cause,
                        cleanup,
                    })
                }
            },
        }
    }

    pub fn dashboard(&self) -> Result<DashboardStats, ModerationError> {
        let properties = self.properties.all()?;
        let profiles = self.profiles.all()?;
        Ok(DashboardStats::compute(&properties, &profiles))
    }

    /// Every listing regardless of status, narrowed by the admin search box and status selector.
    pub fn properties(&self, query: &AdminPropertyQuery) -> Result<Vec<Property>, ModerationError> {
        let properties = self.properties.all()?;
        Ok(search_properties(&properties, query))
    }

    pub fn users(&self, search: Option<&str>) -> Result<Vec<Profile>, ModerationError> {
        let profiles = self.profiles.all()?;
        Ok(search_profiles(&profiles, search))
    }
}
