use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::accounts::domain::{Role, UserId};
use crate::listings::domain::PropertyId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A direct message between two users, optionally about a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<PropertyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// The other participant from `user`'s point of view.
    pub fn counterpart(&self, user: &UserId) -> &UserId {
        if &self.sender_id == user {
            &self.recipient_id
        } else {
            &self.sender_id
        }
    }

    pub fn involves(&self, user: &UserId) -> bool {
        &self.sender_id == user || &self.recipient_id == user
    }

    pub fn is_unread_for(&self, user: &UserId) -> bool {
        &self.recipient_id == user && !self.read
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub recipient_id: UserId,
    #[serde(default)]
    pub property_id: Option<PropertyId>,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

/// One row of the conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub counterpart_id: UserId,
    pub counterpart_name: String,
    pub counterpart_role: Option<Role>,
    pub last_message: Message,
    pub unread: usize,
    pub message_count: usize,
}
