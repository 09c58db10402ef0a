//! Session state for the current principal.
//!
//! SYSTEM CONTEXT
//! ==============
//! `store` is the single source of truth for who is logged in. `storage`
//! persists it across runs, `interceptor` keeps outgoing requests authorized
//! and reacts to expired credentials, and `provider` ties the store's
//! restore-once/teardown lifecycle to an HTTP client.

pub mod interceptor;
pub mod provider;
pub mod storage;
pub mod store;
pub mod user;

pub use interceptor::AuthInterceptor;
pub use provider::SessionProvider;
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::{RestoreOutcome, SessionState, SessionStore};
pub use user::{EntityId, Role, UserProfile, UserRecord};
