//! Authorization for outgoing requests and forced logout on `401`.
//!
//! The token is read from the store per request, so a login or logout is
//! visible to the very next call without touching shared client state.

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod tests;

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, StatusCode};
use tracing::warn;

use super::store::SessionStore;
use crate::api::Interceptor;

pub struct AuthInterceptor {
    session: Arc<SessionStore>,
}

impl AuthInterceptor {
    #[must_use]
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }
}

impl Interceptor for AuthInterceptor {
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.authorization_header() {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    fn on_response(&self, path: &str, status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            warn!(path, "backend rejected credentials; logging out");
            self.session.logout();
        }
    }
}

impl std::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor").finish_non_exhaustive()
    }
}
