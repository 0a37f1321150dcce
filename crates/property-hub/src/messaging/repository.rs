use super::domain::{Message, MessageId};
use crate::accounts::domain::UserId;
use crate::repository::RepositoryError;

/// Storage abstraction over the `messages` collection.
pub trait MessageRepository: Send + Sync {
    /// Messages sent or received by `user`, newest first.
    fn involving(&self, user: &UserId) -> Result<Vec<Message>, RepositoryError>;
    fn fetch(&self, id: &MessageId) -> Result<Option<Message>, RepositoryError>;
    fn insert(&self, message: Message) -> Result<Message, RepositoryError>;
    fn mark_read(&self, id: &MessageId) -> Result<Message, RepositoryError>;
}
