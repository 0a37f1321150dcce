//! Session resolution and the role-gated access guard.

pub mod guard;
pub mod middleware;
pub mod navigation;
pub mod router;
pub mod session;

pub use guard::{evaluate, AccessRequirement, GuardDecision, LOGIN_PATH};
pub use middleware::{denial_response, enforce, AccessGate};
pub use navigation::{NavigationRoute, NavigationTable};
pub use router::navigation_router;
pub use session::{
    bearer_token, Identity, IdentityError, IdentityProvider, Session, SessionResolver,
    SessionState, SessionToken,
};
