use serde::Serialize;

use super::session::SessionState;
use crate::accounts::domain::Role;

/// Path callers are sent to when a protected target needs a signed-in session.
pub const LOGIN_PATH: &str = "/auth";

/// What a navigation target demands of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessRequirement {
    pub require_auth: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_role: Option<Role>,
}

impl AccessRequirement {
    pub const PUBLIC: Self = Self {
        require_auth: false,
        required_role: None,
    };

    pub const AUTHENTICATED: Self = Self {
        require_auth: true,
        required_role: None,
    };

    pub const fn role(role: Role) -> Self {
        Self {
            require_auth: true,
            required_role: Some(role),
        }
    }
}

/// Outcome of evaluating a navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    RenderChildren,
    RedirectToLogin { login_path: &'static str, from: String },
    ShowLoading,
    ShowProfilePending,
    ShowAccessDenied,
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::RenderChildren)
    }
}

/// Evaluates the guard rules in order; the first matching rule decides.
pub fn evaluate(
    state: &SessionState,
    requirement: &AccessRequirement,
    requested_path: &str,
) -> GuardDecision {
    if matches!(state, SessionState::Resolving) {
        return GuardDecision::ShowLoading;
    }

    if requirement.require_auth && state.identity().is_none() {
        return GuardDecision::RedirectToLogin {
            login_path: LOGIN_PATH,
            from: requested_path.to_string(),
        };
    }

    if state.identity().is_some() && state.profile().is_none() {
        return GuardDecision::ShowProfilePending;
    }

    if let Some(required) = requirement.required_role {
        if state.profile().map(|profile| profile.role) != Some(required) {
            return GuardDecision::ShowAccessDenied;
        }
    }

    GuardDecision::RenderChildren
}
