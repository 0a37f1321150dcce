//! Property listings: domain model, the filter/sort/view pipeline, submission, and seed import.

pub mod catalog;
pub mod domain;
pub mod filter;
pub mod repository;
pub mod router;
pub mod seed;
pub mod sort;
pub mod store;
pub mod submission;
pub mod view;

pub use catalog::{CatalogError, ListingCatalog, DEFAULT_PAGE_SIZE};
pub use domain::{ListingType, Property, PropertyId, PropertyStatus};
pub use filter::{filter_properties, FilterCriteria};
pub use repository::PropertyRepository;
pub use router::listings_router;
pub use seed::{SeedImportError, SeedImporter};
pub use sort::{sort_properties, SortKey, UnknownSortKey};
pub use store::PropertyStore;
pub use submission::{PropertyDraft, SubmissionError, SubmissionPolicy, DEFAULT_MAX_IMAGES};
pub use view::{ListingQuery, ListingView, Pagination};
