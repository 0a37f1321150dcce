use super::domain::{Profile, ProfileId, Role, UserId};
use crate::repository::RepositoryError;

/// Storage abstraction over the `profiles` collection.
pub trait ProfileRepository: Send + Sync {
    /// All profiles, newest first.
    fn list(&self) -> Result<Vec<Profile>, RepositoryError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError>;
    fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, RepositoryError>;
    /// Fails with [`RepositoryError::Conflict`] when the identity already owns a profile.
    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError>;
    fn update_role(&self, id: &ProfileId, role: Role) -> Result<Profile, RepositoryError>;
    fn delete(&self, id: &ProfileId) -> Result<(), RepositoryError>;
}
