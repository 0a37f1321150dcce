//! Administrator moderation of listings and users, plus dashboard statistics.

pub mod dashboard;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use dashboard::{
    search_profiles, search_properties, AdminPropertyQuery, AdminUserQuery, DashboardStats,
    StatusFilter,
};
pub use router::admin_router;
pub use service::{AgentDraft, Confirmation, ModerationError, ModerationService};
