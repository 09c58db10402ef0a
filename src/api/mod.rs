//! REST access to the maintenance backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` sends requests through an interceptor chain, `types` holds the
//! wire DTOs and `ApiError`, and `endpoints` wraps each backend route in a
//! typed call. The session layer plugs into `client` through
//! [`Interceptor`]; nothing here reads the session directly.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{ApiClient, Interceptor, InterceptorHandle};
pub use types::{
    ApiError, Asset, Frequency, LoginResponse, MaintenancePlan, NewAsset, NewUser, TaskReport, WorkOrder,
};
