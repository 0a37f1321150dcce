use super::domain::{Property, PropertyId, PropertyStatus};
use crate::repository::RepositoryError;

/// Storage abstraction over the `properties` collection.
pub trait PropertyRepository: Send + Sync {
    /// All listings, newest first.
    fn list(&self) -> Result<Vec<Property>, RepositoryError>;
    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError>;
    fn insert(&self, property: Property) -> Result<Property, RepositoryError>;
    fn update_status(
        &self,
        id: &PropertyId,
        status: PropertyStatus,
    ) -> Result<Property, RepositoryError>;
    fn delete(&self, id: &PropertyId) -> Result<(), RepositoryError>;
}
