//! Direct messages between buyers, owners, and agents.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{ConversationSummary, Message, MessageDraft, MessageId};
pub use repository::MessageRepository;
pub use router::messages_router;
pub use service::{MessagingError, MessagingService};
