//! User identities, profiles, and roles.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

pub use domain::{CurrentUser, Profile, ProfileId, Role, UnknownRole, UserId, MIN_PASSWORD_LENGTH};
pub use repository::ProfileRepository;
pub use router::auth_router;
pub use service::{AccountError, AccountService, SessionGrant, SignInRequest, SignUpRequest};
pub use store::ProfileStore;
