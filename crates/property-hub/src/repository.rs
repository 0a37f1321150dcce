/// Error enumeration shared by every data-store collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("data store unavailable: {0}")]
    Unavailable(String),
}
