use std::sync::Arc;

use axum::Router;

use crate::access::{
    navigation_router, AccessGate, AccessRequirement, IdentityProvider, NavigationTable,
    SessionResolver,
};
use crate::accounts::{auth_router, AccountService, ProfileRepository, ProfileStore, Role};
use crate::config::ListingsConfig;
use crate::listings::{
    listings_router, ListingCatalog, Property, PropertyRepository, PropertyStore,
    SubmissionPolicy,
};
use crate::memory::{
    MemoryIdentityProvider, MemoryMessageRepository, MemoryProfileRepository,
    MemoryPropertyRepository,
};
use crate::messaging::{messages_router, MessageRepository, MessagingService};
use crate::moderation::{admin_router, ModerationService};

/// External collaborators the hub is assembled from.
#[derive(Clone)]
pub struct Backend {
    pub properties: Arc<dyn PropertyRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub identities: Arc<dyn IdentityProvider>,
}

impl Backend {
    /// In-memory collaborators seeded with `properties` (newest first).
    pub fn in_memory(properties: Vec<Property>) -> Self {
        Self {
            properties: Arc::new(MemoryPropertyRepository::with_properties(properties)),
            profiles: Arc::new(MemoryProfileRepository::default()),
            messages: Arc::new(MemoryMessageRepository::default()),
            identities: Arc::new(MemoryIdentityProvider::default()),
        }
    }
}

/// Shared application services; cloned into every request handler.
#[derive(Clone)]
pub struct PropertyHub {
    pub catalog: Arc<ListingCatalog>,
    pub moderation: Arc<ModerationService>,
    pub messaging: Arc<MessagingService>,
    pub accounts: Arc<AccountService>,
    pub sessions: Arc<SessionResolver>,
    pub navigation: Arc<NavigationTable>,
    pub properties: Arc<PropertyStore>,
    pub profiles: Arc<ProfileStore>,
}

impl PropertyHub {
    pub fn new(backend: Backend, listings: &ListingsConfig) -> Self {
        let properties = Arc::new(PropertyStore::new(backend.properties));
        let profiles = Arc::new(ProfileStore::new(backend.profiles));
        let policy = SubmissionPolicy::new(listings.max_images);

        Self {
            catalog: Arc::new(ListingCatalog::new(
                properties.clone(),
                policy,
                listings.page_size,
            )),
            moderation: Arc::new(ModerationService::new(
                properties.clone(),
                profiles.clone(),
                backend.identities.clone(),
                policy,
            )),
            messaging: Arc::new(MessagingService::new(
                backend.messages,
                profiles.clone(),
                properties.clone(),
            )),
            accounts: Arc::new(AccountService::new(
                backend.identities.clone(),
                profiles.clone(),
            )),
            sessions: Arc::new(SessionResolver::new(backend.identities, profiles.clone())),
            navigation: Arc::new(NavigationTable::standard()),
            properties,
            profiles,
        }
    }

    pub fn gate(&self, requirement: AccessRequirement) -> AccessGate {
        AccessGate::new(self.sessions.clone(), requirement)
    }
}

/// Every `/api/v1` route with its access gate applied.
pub fn api_router(hub: PropertyHub) -> Router {
    let authenticated = hub.gate(AccessRequirement::AUTHENTICATED);
    let admin = hub.gate(AccessRequirement::role(Role::Admin));

    Router::new()
        .merge(navigation_router())
        .merge(auth_router(authenticated.clone()))
        .merge(listings_router(authenticated.clone()))
        .merge(messages_router(authenticated))
        .merge(admin_router(admin))
        .with_state(hub)
}
