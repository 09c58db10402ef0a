//! Route guards: pure allow/redirect decisions over a session snapshot.
//!
//! Every "where does this role belong" answer comes from
//! [`dashboard_path`]; guards never map roles to paths themselves.

#[cfg(test)]
#[path = "guards_test.rs"]
mod tests;

use crate::session::{Role, SessionState};

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ADMIN_DASHBOARD_PATH: &str = "/admin-dashboard";
pub const SUPERVISOR_DASHBOARD_PATH: &str = "/supervisor-dashboard";
pub const TECHNICIAN_DASHBOARD_PATH: &str = "/technician-dashboard";

/// Home dashboard for a role. Plain users, unknown roles and a missing
/// role all land on `/dashboard`.
#[must_use]
pub fn dashboard_path(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => ADMIN_DASHBOARD_PATH,
        Some(Role::Supervisor) => SUPERVISOR_DASHBOARD_PATH,
        Some(Role::Technician) => TECHNICIAN_DASHBOARD_PATH,
        Some(Role::User | Role::Unknown) | None => DASHBOARD_PATH,
    }
}

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// Navigate elsewhere. `replace` overwrites the denied entry in history.
    Redirect { to: &'static str, replace: bool },
}

impl GuardDecision {
    fn push(to: &'static str) -> Self {
        Self::Redirect { to, replace: false }
    }

    fn replace(to: &'static str) -> Self {
        Self::Redirect { to, replace: true }
    }

    /// Redirect target, `None` when the route renders.
    #[must_use]
    pub fn target(self) -> Option<&'static str> {
        match self {
            Self::Render => None,
            Self::Redirect { to, .. } => Some(to),
        }
    }
}

/// Public pages: logged-in users are sent to their dashboard.
#[must_use]
pub fn redirect_if_authenticated(state: &SessionState) -> GuardDecision {
    if state.is_authenticated() { GuardDecision::push(dashboard_path(state.role())) } else { GuardDecision::Render }
}

/// Any authenticated role may enter; everyone else goes to `/`.
#[must_use]
pub fn require_auth(state: &SessionState) -> GuardDecision {
    if state.is_authenticated() { GuardDecision::Render } else { GuardDecision::replace(ROOT_PATH) }
}

/// Only `required` may enter. Anonymous visitors go to `/`; other roles are
/// sent to their own dashboard.
#[must_use]
pub fn require_role(state: &SessionState, required: Role) -> GuardDecision {
    match state.role() {
        None => GuardDecision::replace(ROOT_PATH),
        Some(role) if role == required => GuardDecision::Render,
        Some(role) => GuardDecision::replace(dashboard_path(Some(role))),
    }
}

/// Guard attached to a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    RedirectIfAuthenticated,
    RequireAuth,
    RequireRole(Role),
}

impl Guard {
    #[must_use]
    pub fn check(self, state: &SessionState) -> GuardDecision {
        match self {
            Self::RedirectIfAuthenticated => redirect_if_authenticated(state),
            Self::RequireAuth => require_auth(state),
            Self::RequireRole(role) => require_role(state, role),
        }
    }
}
