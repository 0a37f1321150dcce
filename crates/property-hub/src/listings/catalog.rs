use std::sync::Arc;

use tracing::info;

use super::domain::{Property, PropertyId};
use super::store::PropertyStore;
use super::submission::{PropertyDraft, SubmissionError, SubmissionPolicy};
use super::view::{ListingQuery, ListingView, Pagination};
use crate::accounts::domain::CurrentUser;
use crate::repository::RepositoryError;

/// Default number of cards per listing page.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Public-facing listing operations: browsing, detail lookup, and submission.
pub struct ListingCatalog {
    store: Arc<PropertyStore>,
    policy: SubmissionPolicy,
    page_size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ListingCatalog {
    pub fn new(store: Arc<PropertyStore>, policy: SubmissionPolicy, page_size: usize) -> Self {
        Self {
            store,
            policy,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Active listings run through filter, sort, and pagination.
    pub fn public_listings(&self, query: &ListingQuery) -> Result<ListingView, CatalogError> {
        let snapshot = self.store.all()?;
        let active: Vec<Property> = snapshot
            .iter()
            .filter(|property| property.is_active())
            .cloned()
            .collect();

        Ok(ListingView::compose(
            &active,
            &query.criteria(),
            query.sort_key(),
            Pagination::new(query.page, self.page_size),
        ))
    }

    /// Active listings are visible to everyone; other states only to the owner and admins.
    /// Hidden listings report as missing.
    pub fn fetch(
        &self,
        id: &PropertyId,
        viewer: Option<&CurrentUser>,
    ) -> Result<Property, CatalogError> {
        let property = self.store.fetch(id)?.ok_or(RepositoryError::NotFound)?;

        let visible = property.is_active()
            || viewer.is_some_and(|user| user.is_admin() || user.user_id == property.owner_id);
        if visible {
            Ok(property)
        } else {
            Err(RepositoryError::NotFound.into())
        }
    }

    pub fn submit(
        &self,
        author: &CurrentUser,
        draft: PropertyDraft,
    ) -> Result<Property, CatalogError> {
        let property = self.policy.prepare(draft, &author.user_id, author.role())?;
        let stored = self.store.insert(property)?;
        info!(
            property_id = %stored.id,
            owner = %stored.owner_id,
            status = stored.status.label(),
            "listing submitted"
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::domain::{Profile, Role, UserId};
    use crate::fixtures::catalog;
    use crate::listings::domain::PropertyStatus;
    use crate::memory::MemoryPropertyRepository;

    fn listing_catalog(properties: Vec<Property>) -> ListingCatalog {
        let repository = Arc::new(MemoryPropertyRepository::with_properties(properties));
        let store = Arc::new(PropertyStore::new(repository));
        ListingCatalog::new(store, SubmissionPolicy::default(), 4)
    }

    fn user(id: &str, role: Role) -> CurrentUser {
        let user_id = UserId(id.to_string());
        CurrentUser {
            user_id: user_id.clone(),
            email: format!("{id}@example.com"),
            profile: Profile::new(user_id, Some(id.to_string()), None, role),
        }
    }

    fn with_pending_listing() -> Vec<Property> {
        let mut listings = catalog();
        listings[1].status = PropertyStatus::Pending;
        listings
    }

    #[test]
    fn public_listings_only_show_active_properties() {
        let catalog = listing_catalog(with_pending_listing());

        let view = catalog
            .public_listings(&ListingQuery::default())
            .expect("view");

        assert_eq!(view.total, 5);
        assert_eq!(view.per_page, 4);
        assert!(view.has_more);
        assert!(view.properties.iter().all(Property::is_active));
    }

    #[test]
    fn hidden_listing_is_visible_to_owner_and_admin_only() {
        let catalog = listing_catalog(with_pending_listing());
        let id = PropertyId("2".to_string());

        assert!(matches!(
            catalog.fetch(&id, None),
            Err(CatalogError::Repository(RepositoryError::NotFound))
        ));
        assert!(catalog
            .fetch(&id, Some(&user("stranger", Role::User)))
            .is_err());
        assert!(catalog.fetch(&id, Some(&user("owner-1", Role::User))).is_ok());
        assert!(catalog.fetch(&id, Some(&user("root", Role::Admin))).is_ok());
        assert!(catalog.fetch(&PropertyId("1".to_string()), None).is_ok());
    }

    #[test]
    fn submissions_land_in_the_shared_snapshot() {
        let catalog = listing_catalog(catalog());
        let draft = PropertyDraft {
            title: "Terrace in Yaba".to_string(),
            description: None,
            price: 950_000,
            location: "Yaba, Lagos".to_string(),
            address: None,
            bedrooms: Some(2),
            bathrooms: Some(1),
            area_sqm: None,
            listing_type: "rent".to_string(),
            property_type: "Terrace".to_string(),
            images: Vec::new(),
            features: Vec::new(),
        };

        let stored = catalog
            .submit(&user("agent-9", Role::Agent), draft.clone())
            .expect("stored");
        assert_eq!(stored.status, PropertyStatus::Pending);
        assert_eq!(
            catalog
                .public_listings(&ListingQuery::default())
                .expect("view")
                .total,
            6
        );

        let published = catalog
            .submit(&user("root", Role::Admin), draft)
            .expect("stored");
        assert_eq!(published.status, PropertyStatus::Active);
        assert_eq!(
            catalog
                .public_listings(&ListingQuery::default())
                .expect("view")
                .total,
            7
        );
    }
}
