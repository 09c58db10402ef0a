//! HTTP client for the maintenance backend with a request/response
//! interceptor chain.
//!
//! ARCHITECTURE
//! ============
//! Every call goes through [`ApiClient::send`]: interceptors decorate the
//! outgoing request in registration order, the request is sent, then every
//! interceptor sees the response status before the status is mapped to an
//! `ApiError`. A `401` is therefore observed (and acted on) by interceptors
//! before the caller gets `ApiError::Unauthorized` back.
//!
//! Registration hands out an [`InterceptorHandle`]; dropping it removes the
//! interceptor, so owners that come and go never leave duplicates behind.
//! Removal applies to requests started afterwards: a request in flight keeps
//! the chain it started with and still reports its status to every
//! interceptor in it.

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::types::ApiError;
use crate::config::{ClientConfig, Timeouts};

// =============================================================================
// INTERCEPTORS
// =============================================================================

/// Hook run around every request made through an [`ApiClient`].
pub trait Interceptor: Send + Sync {
    /// Decorate the outgoing request.
    fn on_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }

    /// Observe the response status. Runs for every response, success or not.
    fn on_response(&self, _path: &str, _status: StatusCode) {}
}

#[derive(Default)]
struct InterceptorRegistry {
    next_id: AtomicU64,
    entries: Mutex<Vec<(u64, Arc<dyn Interceptor>)>>,
}

impl InterceptorRegistry {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Arc<dyn Interceptor>)>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn snapshot(&self) -> Vec<Arc<dyn Interceptor>> {
        self.lock().iter().map(|(_, i)| Arc::clone(i)).collect()
    }

    fn remove(&self, id: u64) {
        self.lock().retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Keeps an interceptor registered. Dropping it deregisters.
#[must_use = "dropping the handle deregisters the interceptor immediately"]
pub struct InterceptorHandle {
    id: u64,
    registry: Weak<InterceptorRegistry>,
}

impl Drop for InterceptorHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl std::fmt::Debug for InterceptorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorHandle").field("id", &self.id).finish()
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Cheap to clone; clones share the connection pool and interceptor chain.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    interceptors: Arc<InterceptorRegistry>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url, interceptors: Arc::new(InterceptorRegistry::default()) })
    }

    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Add an interceptor to the end of the chain.
    pub fn register_interceptor(&self, interceptor: Arc<dyn Interceptor>) -> InterceptorHandle {
        let id = self.interceptors.next_id.fetch_add(1, Ordering::Relaxed);
        self.interceptors.lock().push((id, interceptor));
        InterceptorHandle { id, registry: Arc::downgrade(&self.interceptors) }
    }

    #[must_use]
    pub fn interceptor_count(&self) -> usize {
        self.interceptors.lock().len()
    }

    /// Send a request through the interceptor chain and return the response
    /// if its status is a success.
    ///
    /// # Errors
    ///
    /// - `ApiError::Transport` when the request could not be sent.
    /// - `ApiError::Unauthorized` for a `401`, after interceptors ran.
    /// - `ApiError::Status` for any other non-success status.
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        // Fixed for the whole request, including after the await.
        let interceptors = self.interceptors.snapshot();

        let mut request = self.http.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        for interceptor in &interceptors {
            request = interceptor.on_request(request);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport { path: path.to_owned(), source })?;

        let status = response.status();
        for interceptor in &interceptors {
            interceptor.on_response(path, status);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized { path: path.to_owned() });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%method, path, status = status.as_u16(), "backend request failed");
            return Err(ApiError::Status { path: path.to_owned(), status: status.as_u16(), body });
        }
        Ok(response)
    }

    /// Send and return the raw response body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; also fails if the body cannot be read.
    pub async fn request_text<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<String, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        response
            .text()
            .await
            .map_err(|source| ApiError::Transport { path: path.to_owned(), source })
    }

    /// Send and decode a JSON response body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`]; also fails with `ApiError::Decode` if the body
    /// is not the expected JSON.
    pub async fn request_json<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.request_text(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode { path: path.to_owned(), message: e.to_string() })
    }

    /// # Errors
    ///
    /// See [`ApiClient::request_json`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json::<(), T>(Method::GET, path, None).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request_json`].
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, Some(body)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request_json`].
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_json(Method::PUT, path, Some(body)).await
    }

    /// Send a `DELETE`, ignoring any response body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, path, None).await.map(|_| ())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptor_count())
            .finish_non_exhaustive()
    }
}
