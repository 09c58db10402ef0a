//! Mount point for the session: restore once, keep requests authorized while
//! mounted, and deregister on drop.
//!
//! DESIGN
//! ======
//! A provider owns the [`InterceptorHandle`] it registered. Dropping the
//! provider drops the handle, so unmount/remount cycles never stack
//! duplicate interceptors on a shared client.

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;

use std::sync::Arc;

use tracing::debug;

use super::interceptor::AuthInterceptor;
use super::store::{RestoreOutcome, SessionStore};
use crate::api::{ApiClient, InterceptorHandle};

pub struct SessionProvider {
    session: Arc<SessionStore>,
    restored: RestoreOutcome,
    _interceptor: InterceptorHandle,
}

impl SessionProvider {
    /// Restore `session` from storage and register its interceptor on
    /// `client`.
    #[must_use]
    pub fn mount(session: Arc<SessionStore>, client: &ApiClient) -> Self {
        let restored = session.restore();
        let interceptor = client.register_interceptor(Arc::new(AuthInterceptor::new(Arc::clone(&session))));
        debug!(authenticated = session.is_authenticated(), "session provider mounted");
        Self { session, restored, _interceptor: interceptor }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// What the mount-time restore found.
    #[must_use]
    pub fn restored(&self) -> &RestoreOutcome {
        &self.restored
    }
}

impl Drop for SessionProvider {
    fn drop(&mut self) {
        debug!("session provider unmounted");
    }
}

impl std::fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionProvider")
            .field("session", &self.session)
            .field("restored", &matches!(self.restored, RestoreOutcome::Restored(_)))
            .finish_non_exhaustive()
    }
}
