//! Application route table and navigation resolution.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each path maps to one [`AppRoute`]; each route carries the guard that
//! decides whether it renders for the current session. [`resolve`] applies
//! one guard, [`follow`] chases redirects until something renders. Both are
//! pure: they read a `SessionState` snapshot and never navigate.

pub mod guards;

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

use std::fmt;

pub use guards::{
    DASHBOARD_PATH, Guard, GuardDecision, LOGIN_PATH, ROOT_PATH, dashboard_path, redirect_if_authenticated,
    require_auth, require_role,
};

use crate::session::{Role, SessionState};

/// Upper bound on redirects followed for one navigation.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Landing,
    Login,
    Register,
    ForgotPassword,
    Dashboard,
    AdminDashboard,
    SupervisorDashboard,
    TechnicianDashboard,
    /// Anything else.
    NotFound,
}

impl AppRoute {
    pub const ALL: [Self; 9] = [
        Self::Landing,
        Self::Login,
        Self::Register,
        Self::ForgotPassword,
        Self::Dashboard,
        Self::AdminDashboard,
        Self::SupervisorDashboard,
        Self::TechnicianDashboard,
        Self::NotFound,
    ];

    /// Match a location to a route. Query string, fragment and a trailing
    /// slash are ignored.
    #[must_use]
    pub fn from_path(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => ROOT_PATH,
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == Some(path)).unwrap_or(Self::NotFound)
    }

    /// Canonical path; `None` for the catch-all.
    #[must_use]
    pub fn path(self) -> Option<&'static str> {
        match self {
            Self::Landing => Some(ROOT_PATH),
            Self::Login => Some(LOGIN_PATH),
            Self::Register => Some("/register"),
            Self::ForgotPassword => Some("/forgot-password"),
            Self::Dashboard => Some(DASHBOARD_PATH),
            Self::AdminDashboard => Some(guards::ADMIN_DASHBOARD_PATH),
            Self::SupervisorDashboard => Some(guards::SUPERVISOR_DASHBOARD_PATH),
            Self::TechnicianDashboard => Some(guards::TECHNICIAN_DASHBOARD_PATH),
            Self::NotFound => None,
        }
    }

    /// Guard protecting the route; `None` for the catch-all, which never
    /// renders.
    #[must_use]
    pub fn guard(self) -> Option<Guard> {
        match self {
            Self::Landing | Self::Login | Self::Register | Self::ForgotPassword => Some(Guard::RedirectIfAuthenticated),
            Self::Dashboard => Some(Guard::RequireAuth),
            Self::AdminDashboard => Some(Guard::RequireRole(Role::Admin)),
            Self::SupervisorDashboard => Some(Guard::RequireRole(Role::Supervisor)),
            Self::TechnicianDashboard => Some(Guard::RequireRole(Role::Technician)),
            Self::NotFound => None,
        }
    }

    /// Decision for this route under `state`. Unknown paths send
    /// authenticated users to their dashboard and everyone else to `/login`.
    #[must_use]
    pub fn decide(self, state: &SessionState) -> GuardDecision {
        match self.guard() {
            Some(guard) => guard.check(state),
            None if state.is_authenticated() => {
                GuardDecision::Redirect { to: dashboard_path(state.role()), replace: false }
            }
            None => GuardDecision::Redirect { to: LOGIN_PATH, replace: false },
        }
    }
}

impl fmt::Display for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().unwrap_or("*"))
    }
}

/// One navigation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Render(AppRoute),
    Redirect { to: &'static str, replace: bool },
}

/// Resolve a single navigation to `location`.
#[must_use]
pub fn resolve(location: &str, state: &SessionState) -> Resolution {
    let route = AppRoute::from_path(location);
    match route.decide(state) {
        GuardDecision::Render => Resolution::Render(route),
        GuardDecision::Redirect { to, replace } => Resolution::Redirect { to, replace },
    }
}

/// A navigation followed to the route that finally renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Followed {
    pub route: AppRoute,
    /// Redirect targets visited on the way, in order.
    pub hops: Vec<&'static str>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("navigation to {from} did not settle after {limit} redirects")]
    TooManyRedirects { from: String, limit: usize },
}

/// Follow redirects from `location` until a route renders.
///
/// # Errors
///
/// Returns `RouteError::TooManyRedirects` if no route renders within
/// [`MAX_REDIRECTS`] hops.
pub fn follow(location: &str, state: &SessionState) -> Result<Followed, RouteError> {
    let mut hops = Vec::new();
    let mut target = location;
    loop {
        match resolve(target, state) {
            Resolution::Render(route) => return Ok(Followed { route, hops }),
            Resolution::Redirect { to, .. } => {
                if hops.len() == MAX_REDIRECTS {
                    return Err(RouteError::TooManyRedirects { from: location.to_owned(), limit: MAX_REDIRECTS });
                }
                hops.push(to);
                target = to;
            }
        }
    }
}
