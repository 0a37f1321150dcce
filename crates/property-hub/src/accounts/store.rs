use std::sync::Arc;

use tracing::warn;

use super::domain::{Profile, ProfileId, Role, UserId};
use super::repository::ProfileRepository;
use crate::repository::RepositoryError;
use crate::snapshot::Snapshot;

/// Owns the canonical profile snapshot and re-fetches it after every successful mutation.
pub struct ProfileStore {
    repository: Arc<dyn ProfileRepository>,
    snapshot: Snapshot<Profile>,
}

impl ProfileStore {
    pub fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self {
            repository,
            snapshot: Snapshot::new(),
        }
    }

    pub fn all(&self) -> Result<Arc<Vec<Profile>>, RepositoryError> {
        self.snapshot.get_or_load(|| self.repository.list())
    }

    pub fn refresh(&self) -> Result<Arc<Vec<Profile>>, RepositoryError> {
        self.snapshot.refresh(|| self.repository.list())
    }

    pub fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
        self.repository.fetch(id)
    }

    pub fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        self.repository.find_by_user(user_id)
    }

    pub fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let stored = self.repository.insert(profile)?;
        self.after_mutation();
        Ok(stored)
    }

    pub fn update_role(&self, id: &ProfileId, role: Role) -> Result<Profile, RepositoryError> {
        let updated = self.repository.update_role(id, role)?;
        self.after_mutation();
        Ok(updated)
    }

    pub fn delete(&self, id: &ProfileId) -> Result<(), RepositoryError> {
        self.repository.delete(id)?;
        self.after_mutation();
        Ok(())
    }

    fn after_mutation(&self) {
        if let Err(err) = self.refresh() {
            warn!(error = %err, "profile re-fetch failed; snapshot invalidated");
            self.snapshot.invalidate();
        }
    }
}
