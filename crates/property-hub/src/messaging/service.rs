use std::collections::HashMap;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;
use tracing::debug;

use super::domain::{ConversationSummary, Message, MessageDraft, MessageId};
use super::repository::MessageRepository;
use crate::accounts::domain::{non_blank, CurrentUser, Profile, UserId};
use crate::accounts::store::ProfileStore;
use crate::listings::domain::PropertyId;
use crate::listings::store::PropertyStore;
use crate::repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("message body must not be empty")]
    EmptyBody,
    #[error("cannot send a message to yourself")]
    SelfAddressed,
    #[error("recipient {0} has no profile")]
    UnknownRecipient(UserId),
    #[error("property {0} does not exist")]
    UnknownProperty(PropertyId),
    #[error("only the recipient can mark a message as read")]
    NotRecipient,
    #[error("message not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntoResponse for MessagingError {
    fn into_response(self) -> Response {
        let status = match &self {
            MessagingError::EmptyBody
            | MessagingError::SelfAddressed
            | MessagingError::UnknownRecipient(_)
            | MessagingError::UnknownProperty(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MessagingError::NotRecipient => StatusCode::FORBIDDEN,
            MessagingError::NotFound | MessagingError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            MessagingError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            MessagingError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Direct messages between marketplace users.
pub struct MessagingService {
    messages: Arc<dyn MessageRepository>,
    profiles: Arc<ProfileStore>,
    properties: Arc<PropertyStore>,
}

impl MessagingService {
    pub fn new(
        messages: Arc<dyn MessageRepository>,
        profiles: Arc<ProfileStore>,
        properties: Arc<PropertyStore>,
    ) -> Self {
        Self {
            messages,
            profiles,
            properties,
        }
    }

    pub fn send(&self, sender: &CurrentUser, draft: MessageDraft) -> Result<Message, MessagingError> {
        let body = non_blank(draft.message).ok_or(MessagingError::EmptyBody)?;
        if draft.recipient_id == sender.user_id {
            return Err(MessagingError::SelfAddressed);
        }
        if self.profiles.find_by_user(&draft.recipient_id)?.is_none() {
            return Err(MessagingError::UnknownRecipient(draft.recipient_id));
        }
        if let Some(property_id) = &draft.property_id {
            if self.properties.fetch(property_id)?.is_none() {
                return Err(MessagingError::UnknownProperty(property_id.clone()));
            }
        }

        let message = Message {
            id: MessageId::generate(),
            sender_id: sender.user_id.clone(),
            recipient_id: draft.recipient_id,
            property_id: draft.property_id,
            subject: draft.subject.and_then(non_blank),
            message: body,
            read: false,
            created_at: Utc::now(),
        };
        let stored = self.messages.insert(message)?;
        debug!(message_id = %stored.id, recipient = %stored.recipient_id, "message sent");
        Ok(stored)
    }

    /// Every message the caller sent or received, newest first.
    pub fn inbox(&self, user: &CurrentUser) -> Result<Vec<Message>, MessagingError> {
        Ok(self.messages.involving(&user.user_id)?)
    }

    /// Messages grouped by the other participant, most recent conversation first. `search`
    /// matches the counterpart's name case-insensitively.
    pub fn conversations(
        &self,
        user: &CurrentUser,
        search: Option<&str>,
    ) -> Result<Vec<ConversationSummary>, MessagingError> {
        let messages = self.messages.involving(&user.user_id)?;
        let profiles = self.profiles.all()?;
        let by_user: HashMap<&UserId, &Profile> = profiles
            .iter()
            .map(|profile| (&profile.user_id, profile))
            .collect();

        let mut summaries: Vec<ConversationSummary> = Vec::new();
        let mut positions: HashMap<UserId, usize> = HashMap::new();
        for message in messages {
            let counterpart = message.counterpart(&user.user_id).clone();
            let unread = usize::from(message.is_unread_for(&user.user_id));
            match positions.get(&counterpart) {
                Some(&index) => {
                    let summary = &mut summaries[index];
                    summary.unread += unread;
                    summary.message_count += 1;
                }
                None => {
                    let profile = by_user.get(&counterpart);
                    positions.insert(counterpart.clone(), summaries.len());
                    summaries.push(ConversationSummary {
                        counterpart_name: profile
                            .map(|profile| profile.display_name().to_string())
                            .unwrap_or_else(|| "Unknown user".to_string()),
                        counterpart_role: profile.map(|profile| profile.role),
                        counterpart_id: counterpart,
                        last_message: message,
                        unread,
                        message_count: 1,
                    });
                }
            }
        }

        let needle = search
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);
        if let Some(needle) = needle {
            summaries.retain(|summary| summary.counterpart_name.to_lowercase().contains(&needle));
        }
        Ok(summaries)
    }

    pub fn mark_read(&self, user: &CurrentUser, id: &MessageId) -> Result<Message, MessagingError> {
        let message = self.messages.fetch(id)?.ok_or(MessagingError::NotFound)?;
        if message.recipient_id != user.user_id {
            return Err(MessagingError::NotRecipient);
        }
        if message.read {
            return Ok(message);
        }
        Ok(self.messages.mark_read(id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::domain::Role;
    use crate::fixtures::catalog;
    use crate::memory::{MemoryMessageRepository, MemoryProfileRepository, MemoryPropertyRepository};

    struct Fixture {
        service: MessagingService,
        buyer: CurrentUser,
        agent: CurrentUser,
        landlord: CurrentUser,
    }

    fn member(id: &str, name: &str, role: Role) -> CurrentUser {
        let user_id = UserId(id.to_string());
        CurrentUser {
            user_id: user_id.clone(),
            email: format!("{id}@example.com"),
            profile: Profile::new(user_id, Some(name.to_string()), None, role),
        }
    }

    fn fixture() -> Fixture {
        let buyer = member("buyer", "Ngozi Eze", Role::User);
        let agent = member("agent", "Adewale Johnson", Role::Agent);
        let landlord = member("landlord", "Emeka Chukwu", Role::User);
        let profiles = Arc::new(ProfileStore::new(Arc::new(
            MemoryProfileRepository::with_profiles(vec![
                buyer.profile.clone(),
                agent.profile.clone(),
                landlord.profile.clone(),
            ]),
        )));
        let properties = Arc::new(PropertyStore::new(Arc::new(
            MemoryPropertyRepository::with_properties(catalog()),
        )));
        let service = MessagingService::new(
            Arc::new(MemoryMessageRepository::default()),
            profiles,
            properties,
        );
        Fixture {
            service,
            buyer,
            agent,
            landlord,
        }
    }

    fn draft(to: &CurrentUser, body: &str) -> MessageDraft {
        MessageDraft {
            recipient_id: to.user_id.clone(),
            property_id: None,
            subject: None,
            message: body.to_string(),
        }
    }

    #[test]
    fn send_validates_body_recipient_and_property() {
        let f = fixture();

        assert!(matches!(
            f.service.send(&f.buyer, draft(&f.agent, "   ")),
            Err(MessagingError::EmptyBody)
        ));
        assert!(matches!(
            f.service.send(&f.buyer, draft(&f.buyer, "hello me")),
            Err(MessagingError::SelfAddressed)
        ));

        let stranger = member("ghost", "Ghost", Role::User);
        assert!(matches!(
            f.service.send(&f.buyer, draft(&stranger, "anyone?")),
            Err(MessagingError::UnknownRecipient(_))
        ));

        let mut about_missing = draft(&f.agent, "Is it available?");
        about_missing.property_id = Some(PropertyId("missing".to_string()));
        assert!(matches!(
            f.service.send(&f.buyer, about_missing),
            Err(MessagingError::UnknownProperty(_))
        ));

        let mut about_listing = draft(&f.agent, "  Is it available?  ");
        about_listing.property_id = Some(PropertyId("1".to_string()));
        let sent = f.service.send(&f.buyer, about_listing).expect("sent");
        assert_eq!(sent.message, "Is it available?");
        assert!(!sent.read);
    }

    #[test]
    fn conversations_group_by_counterpart_with_unread_counts() {
        let f = fixture();
        f.service
            .send(&f.buyer, draft(&f.agent, "Is the VI flat available?"))
            .expect("sent");
        f.service
            .send(&f.agent, draft(&f.buyer, "Yes, viewing tomorrow at 2 PM"))
            .expect("sent");
        f.service
            .send(&f.agent, draft(&f.buyer, "Bring ID please"))
            .expect("sent");
        f.service
            .send(&f.landlord, draft(&f.buyer, "Rent includes utilities"))
            .expect("sent");

        let summaries = f.service.conversations(&f.buyer, None).expect("summaries");

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].counterpart_name, "Emeka Chukwu");
        assert_eq!(summaries[0].unread, 1);
        assert_eq!(summaries[1].counterpart_name, "Adewale Johnson");
        assert_eq!(summaries[1].counterpart_role, Some(Role::Agent));
        assert_eq!(summaries[1].unread, 2);
        assert_eq!(summaries[1].message_count, 3);
        assert_eq!(summaries[1].last_message.message, "Bring ID please");

        let agent_view = f.service.conversations(&f.agent, None).expect("summaries");
        assert_eq!(agent_view[0].unread, 1);

        let searched = f
            .service
            .conversations(&f.buyer, Some("adewale"))
            .expect("summaries");
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].counterpart_id, f.agent.user_id);
    }

    #[test]
    fn only_recipient_marks_read() {
        let f = fixture();
        let sent = f
            .service
            .send(&f.buyer, draft(&f.agent, "Hello"))
            .expect("sent");

        assert!(matches!(
            f.service.mark_read(&f.buyer, &sent.id),
            Err(MessagingError::NotRecipient)
        ));
        assert!(matches!(
            f.service.mark_read(&f.agent, &MessageId("nope".to_string())),
            Err(MessagingError::NotFound)
        ));

        let read = f.service.mark_read(&f.agent, &sent.id).expect("marked");
        assert!(read.read);
        assert_eq!(f.service.inbox(&f.agent).expect("inbox")[0], read);
    }
}
