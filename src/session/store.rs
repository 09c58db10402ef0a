//! Session store: the single source of truth for who is logged in.
//!
//! DESIGN
//! ======
//! State is `{ user, token }`; "authenticated" is derived from the user being
//! present rather than stored beside it, so the two can never disagree. A
//! token is only ever set together with a user. Every mutation writes
//! through to `SessionStorage` before returning.
//!
//! The store is an explicit service shared through `Arc`. It never talks to
//! the network: the request interceptor reads the token from here on each
//! call and reports `401`s back through `logout`.

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use super::storage::{AUTH_TOKEN_KEY, IS_AUTHENTICATED_KEY, SESSION_KEYS, SessionStorage, StorageError, USER_KEY};
use super::user::{Role, UserRecord};
use crate::nav::{NavigateOptions, Navigator};

/// Public landing path; logout always ends here.
pub const LANDING_PATH: &str = "/";

/// Point-in-time view of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    user: Option<UserRecord>,
    token: Option<String>,
}

impl SessionState {
    /// The logged-out state.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in state. Mostly useful for guard decisions in tests and
    /// renderers that hold their own copy of the session.
    #[must_use]
    pub fn authenticated(user: UserRecord, token: Option<String>) -> Self {
        Self { user: Some(user), token }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Role of the current user, `None` when logged out.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// `Bearer <token>` while a token is held.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }
}

/// Result of reading a persisted session on mount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Token and user were found and the user record parsed.
    Restored(UserRecord),
    /// Nothing was stored, or only part of a session (which is discarded).
    Empty,
    /// Stored data was unreadable; all session keys were purged.
    Failed(String),
}

pub struct SessionStore {
    state: RwLock<SessionState>,
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
}

impl SessionStore {
    /// Create an empty (logged-out) store. Call [`SessionStore::restore`]
    /// once to pick up a persisted session.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>, navigator: Arc<dyn Navigator>) -> Self {
        Self { state: RwLock::new(SessionState::default()), storage, navigator }
    }

    // =========================================================================
    // READ
    // =========================================================================

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.read().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserRecord> {
        self.read().user.clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// Value for the `Authorization` header of the next outgoing request.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        self.read().authorization_header()
    }

    /// True iff a user is loaded and its permission list contains `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.read().user.as_ref().is_some_and(|u| u.has_permission(permission))
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Hydrate from storage. Requires both a token and a user record. A
    /// record that fails to parse purges every session key, and so does a
    /// partial session (a token or a user on its own), so storage never
    /// holds a session that memory does not.
    pub fn restore(&self) -> RestoreOutcome {
        let (token, raw_user) = match self.read_stored() {
            Ok((Some(token), Some(raw_user))) => (token, raw_user),
            Ok((None, None)) => return RestoreOutcome::Empty,
            Ok((token, _)) => {
                warn!(has_token = token.is_some(), "partial session in storage; discarding");
                self.purge_storage();
                return RestoreOutcome::Empty;
            }
            Err(e) => return self.fail_restore(&e.to_string()),
        };

        match serde_json::from_str::<UserRecord>(&raw_user) {
            Ok(user) => {
                info!(role = %user.role, "session restored");
                let mut state = self.write();
                state.user = Some(user.clone());
                state.token = Some(token);
                RestoreOutcome::Restored(user)
            }
            Err(e) => self.fail_restore(&e.to_string()),
        }
    }

    fn read_stored(&self) -> Result<(Option<String>, Option<String>), StorageError> {
        let token = self.storage.get(AUTH_TOKEN_KEY)?;
        let user = self.storage.get(USER_KEY)?;
        Ok((token, user))
    }

    fn fail_restore(&self, reason: &str) -> RestoreOutcome {
        warn!(error = %reason, "stored session unreadable; discarding");
        *self.write() = SessionState::default();
        self.purge_storage();
        RestoreOutcome::Failed(reason.to_owned())
    }

    /// Replace the current principal. `token` is optional for flows that
    /// create a user without the backend; a previous token never carries
    /// over to a new user. A tokenless session lives in memory only: the
    /// next `restore` treats it as partial and discards it.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the session could not be persisted. In
    /// that case storage is purged and the store is left logged out.
    pub fn login(&self, user: UserRecord, token: Option<String>) -> Result<(), StorageError> {
        if let Err(e) = self.persist(&user, token.as_deref()) {
            warn!(error = %e, "session persist failed; clearing session");
            *self.write() = SessionState::default();
            self.purge_storage();
            return Err(e);
        }

        info!(role = %user.role, with_token = token.is_some(), "logged in");
        let mut state = self.write();
        state.user = Some(user);
        state.token = token;
        Ok(())
    }

    fn persist(&self, user: &UserRecord, token: Option<&str>) -> Result<(), StorageError> {
        let raw_user = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &raw_user)?;
        self.storage.set(IS_AUTHENTICATED_KEY, "true")?;
        match token {
            Some(token) => self.storage.set(AUTH_TOKEN_KEY, token),
            None => self.storage.remove(AUTH_TOKEN_KEY),
        }
    }

    /// Clear the session, purge storage, then replace-navigate to `/`.
    /// Safe to call when already logged out.
    pub fn logout(&self) {
        let was_authenticated = {
            let mut state = self.write();
            let was = state.is_authenticated();
            *state = SessionState::default();
            was
        };
        self.purge_storage();
        if was_authenticated {
            info!("logged out");
        }
        self.navigator.navigate(LANDING_PATH, NavigateOptions::replace());
    }

    fn purge_storage(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.storage.remove(key) {
                warn!(key, error = %e, "failed to remove session key");
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SessionStore")
            .field("authenticated", &state.is_authenticated())
            .field("role", &state.role())
            .finish_non_exhaustive()
    }
}
