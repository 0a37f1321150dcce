//! In-memory collaborators used by the service binary, the demo, and the tests.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use argon2::{Algorithm, Argon2, Params, Version};
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::access::session::{Identity, IdentityError, IdentityProvider, Session, SessionToken};
use crate::accounts::domain::{looks_like_email, Profile, ProfileId, Role, UserId, MIN_PASSWORD_LENGTH};
use crate::accounts::repository::ProfileRepository;
use crate::listings::domain::{Property, PropertyId, PropertyStatus};
use crate::listings::repository::PropertyRepository;
use crate::messaging::domain::{Message, MessageId};
use crate::messaging::repository::MessageRepository;
use crate::repository::RepositoryError;

fn poisoned<T>(_: PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("in-memory store lock poisoned".to_string())
}

/// Properties kept newest first.
#[derive(Debug, Default)]
pub struct MemoryPropertyRepository {
    records: RwLock<Vec<Property>>,
}

impl MemoryPropertyRepository {
    /// Seeds the repository; `properties` must already be newest first.
    pub fn with_properties(properties: Vec<Property>) -> Self {
        Self {
            records: RwLock::new(properties),
        }
    }
}

impl PropertyRepository for MemoryPropertyRepository {
    fn list(&self) -> Result<Vec<Property>, RepositoryError> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }

    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.iter().find(|property| &property.id == id).cloned())
    }

    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        if guard.iter().any(|existing| existing.id == property.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(0, property.clone());
        Ok(property)
    }

    fn update_status(
        &self,
        id: &PropertyId,
        status: PropertyStatus,
    ) -> Result<Property, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        let property = guard
            .iter_mut()
            .find(|property| &property.id == id)
            .ok_or(RepositoryError::NotFound)?;
        property.status = status;
        property.updated_at = Utc::now();
        Ok(property.clone())
    }

    fn delete(&self, id: &PropertyId) -> Result<(), RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        let before = guard.len();
        guard.retain(|property| &property.id != id);
        if guard.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }
}

/// Profiles kept newest first; one per identity.
#[derive(Debug, Default)]
pub struct MemoryProfileRepository {
    records: RwLock<Vec<Profile>>,
}

impl MemoryProfileRepository {
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            records: RwLock::new(profiles),
        }
    }
}

impl ProfileRepository for MemoryProfileRepository {
    fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.iter().find(|profile| &profile.id == id).cloned())
    }

    fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard
            .iter()
            .find(|profile| &profile.user_id == user_id)
            .cloned())
    }

    fn insert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        if guard
            .iter()
            .any(|existing| existing.id == profile.id || existing.user_id == profile.user_id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(0, profile.clone());
        Ok(profile)
    }

    fn update_role(&self, id: &ProfileId, role: Role) -> Result<Profile, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        let profile = guard
            .iter_mut()
            .find(|profile| &profile.id == id)
            .ok_or(RepositoryError::NotFound)?;
        profile.role = role;
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    fn delete(&self, id: &ProfileId) -> Result<(), RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        let before = guard.len();
        guard.retain(|profile| &profile.id != id);
        if guard.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }
}

/// Append-only message log.
#[derive(Debug, Default)]
pub struct MemoryMessageRepository {
    records: RwLock<Vec<Message>>,
}

impl MessageRepository for MemoryMessageRepository {
    fn involving(&self, user: &UserId) -> Result<Vec<Message>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        let mut messages: Vec<Message> = guard
            .iter()
            .rev()
            .filter(|message| message.involves(user))
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    fn fetch(&self, id: &MessageId) -> Result<Option<Message>, RepositoryError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.iter().find(|message| &message.id == id).cloned())
    }

    fn insert(&self, message: Message) -> Result<Message, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        if guard.iter().any(|existing| existing.id == message.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(message.clone());
        Ok(message)
    }

    fn mark_read(&self, id: &MessageId) -> Result<Message, RepositoryError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        let message = guard
            .iter_mut()
            .find(|message| &message.id == id)
            .ok_or(RepositoryError::NotFound)?;
        message.read = true;
        Ok(message.clone())
    }
}

struct Account {
    user_id: UserId,
    email: String,
    salt: [u8; 32],
    password_hash: [u8; 32],
}

/// Email/password identities with argon2-hashed credentials and opaque bearer tokens.
pub struct MemoryIdentityProvider {
    hasher: Argon2<'static>,
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<SessionToken, Identity>>,
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        let params = Params::new(8 * 1024, 2, 1, Some(32)).unwrap_or_default();
        Self {
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

fn unavailable<T>(_: PoisonError<T>) -> IdentityError {
    IdentityError::Unavailable("in-memory identity lock poisoned".to_string())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

impl MemoryIdentityProvider {
    pub fn identity_count(&self) -> usize {
        self.accounts
            .read()
            .map(|accounts| accounts.len())
            .unwrap_or_default()
    }

    fn hash(&self, password: &str, salt: &[u8]) -> Result<[u8; 32], IdentityError> {
        let mut hash = [0u8; 32];
        self.hasher
            .hash_password_into(password.as_bytes(), salt, &mut hash)
            .map_err(|err| IdentityError::Unavailable(format!("password hashing failed: {err}")))?;
        Ok(hash)
    }

    fn register(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        if !looks_like_email(email) {
            return Err(IdentityError::InvalidEmail(email.trim().to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(IdentityError::WeakPassword {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let email = normalize_email(email);
        let salt: [u8; 32] = rand::thread_rng().gen();
        let password_hash = self.hash(password, &salt)?;

        let mut accounts = self.accounts.write().map_err(unavailable)?;
        if accounts.contains_key(&email) {
            return Err(IdentityError::EmailTaken(email));
        }
        let user_id = UserId::generate();
        accounts.insert(
            email.clone(),
            Account {
                user_id: user_id.clone(),
                email: email.clone(),
                salt,
                password_hash,
            },
        );
        Ok(Identity { user_id, email })
    }

    fn issue(&self, identity: Identity) -> Result<Session, IdentityError> {
        let token = SessionToken(Uuid::new_v4().simple().to_string());
        self.sessions
            .write()
            .map_err(unavailable)?
            .insert(token.clone(), identity.clone());
        Ok(Session {
            token,
            identity,
            issued_at: Utc::now(),
        })
    }
}

impl IdentityProvider for MemoryIdentityProvider {
    fn sign_up(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let identity = self.register(email, password)?;
        self.issue(identity)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let identity = {
            let accounts = self.accounts.read().map_err(unavailable)?;
            let account = accounts
                .get(&normalize_email(email))
                .ok_or(IdentityError::InvalidCredentials)?;
            if self.hash(password, &account.salt)? != account.password_hash {
                return Err(IdentityError::InvalidCredentials);
            }
            Identity {
                user_id: account.user_id.clone(),
                email: account.email.clone(),
            }
        };
        self.issue(identity)
    }

    fn sign_out(&self, token: &SessionToken) -> Result<(), IdentityError> {
        self.sessions.write().map_err(unavailable)?.remove(token);
        Ok(())
    }

    fn session(&self, token: &SessionToken) -> Result<Option<Identity>, IdentityError> {
        Ok(self.sessions.read().map_err(unavailable)?.get(token).cloned())
    }

    fn create_identity(&self, email: &str, password: &str) -> Result<UserId, IdentityError> {
        Ok(self.register(email, password)?.user_id)
    }

    fn delete_identity(&self, user_id: &UserId) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.write().map_err(unavailable)?;
        let before = accounts.len();
        accounts.retain(|_, account| &account.user_id != user_id);
        if accounts.len() == before {
            return Err(IdentityError::UnknownIdentity(user_id.clone()));
        }
        drop(accounts);

        self.sessions
            .write()
            .map_err(unavailable)?
            .retain(|_, identity| &identity.user_id != user_id);
        Ok(())
    }
}
