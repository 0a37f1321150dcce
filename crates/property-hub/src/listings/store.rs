use std::sync::Arc;

use tracing::warn;

use super::domain::{Property, PropertyId, PropertyStatus};
use super::repository::PropertyRepository;
use crate::repository::RepositoryError;
use crate::snapshot::Snapshot;

/// Owns the canonical property snapshot shared by the public catalog and the admin views.
///
/// Every successful mutation triggers a full re-fetch; failed mutations leave the snapshot as
/// it was.
pub struct PropertyStore {
    repository: Arc<dyn PropertyRepository>,
    snapshot: Snapshot<Property>,
}

impl PropertyStore {
    pub fn new(repository: Arc<dyn PropertyRepository>) -> Self {
        Self {
            repository,
            snapshot: Snapshot::new(),
        }
    }

    pub fn all(&self) -> Result<Arc<Vec<Property>>, RepositoryError> {
        self.snapshot.get_or_load(|| self.repository.list())
    }

    pub fn refresh(&self) -> Result<Arc<Vec<Property>>, RepositoryError> {
        self.snapshot.refresh(|| self.repository.list())
    }

    pub fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        self.repository.fetch(id)
    }

    pub fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        let stored = self.repository.insert(property)?;
        self.after_mutation();
        Ok(stored)
    }

    pub fn set_status(
        &self,
        id: &PropertyId,
        status: PropertyStatus,
    ) -> Result<Property, RepositoryError> {
        let updated = self.repository.update_status(id, status)?;
        self.after_mutation();
        Ok(updated)
    }

    pub fn delete(&self, id: &PropertyId) -> Result<(), RepositoryError> {
        self.repository.delete(id)?;
        self.after_mutation();
        Ok(())
    }

    fn after_mutation(&self) {
        if let Err(err) = self.refresh() {
            warn!(error = %err, "property re-fetch failed; snapshot invalidated");
            self.snapshot.invalidate();
        }
    }
}
