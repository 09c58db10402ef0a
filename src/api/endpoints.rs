//! Typed calls for each backend endpoint.
//!
//! Paths are built by small helpers so tests and the fake backend agree on
//! them. Login calls hand the returned principal to the session store; all
//! other calls rely on the registered interceptors for authorization.

#[cfg(test)]
#[path = "endpoints_test.rs"]
mod tests;

use reqwest::Method;
use tracing::info;

use super::client::ApiClient;
use super::types::{
    ApiError, Asset, GoogleLoginRequest, LoginRequest, LoginResponse, MaintenancePlan, NewAsset, NewUser,
    StatusUpdate, TaskReport, WorkOrder,
};
use crate::session::{EntityId, Role, SessionStore, UserRecord};

pub const LOGIN_PATH: &str = "/user/login";
pub const GOOGLE_LOGIN_PATH: &str = "/auth/oauth/google";
pub const USER_SAVE_PATH: &str = "/user/save";
pub const ASSET_ALL_PATH: &str = "/asset/all";
pub const ASSET_SAVE_PATH: &str = "/asset/save";
pub const WORKORDER_ALL_PATH: &str = "/workorder/all";
pub const WORKORDER_SAVE_PATH: &str = "/workorder/save";
pub const TASK_SAVE_PATH: &str = "/task/save";
pub const MAINTENANCE_PLAN_ALL_PATH: &str = "/maintenanceplan/all";

#[must_use]
pub fn users_by_role_path(role: Role) -> String {
    format!("/user/role/{role}")
}

#[must_use]
pub fn asset_update_path(id: &EntityId) -> String {
    format!("/asset/update/{id}")
}

#[must_use]
pub fn asset_delete_path(id: &EntityId) -> String {
    format!("/asset/delete/{id}")
}

#[must_use]
pub fn workorders_for_user_path(user_id: &EntityId) -> String {
    format!("/workorder/user/{user_id}")
}

#[must_use]
pub fn workorder_update_path(id: &EntityId) -> String {
    format!("/workorder/update/{id}")
}

#[must_use]
pub fn workorder_status_path(id: &EntityId) -> String {
    format!("/workorder/updateStatus/{id}")
}

// =============================================================================
// AUTH
// =============================================================================

/// Exchange email and password for a session and log it in.
///
/// # Errors
///
/// Returns the backend error if the credentials are rejected, or
/// `ApiError::Session` if the session could not be persisted.
pub async fn login_with_password(
    client: &ApiClient,
    session: &SessionStore,
    email: &str,
    password: &str,
) -> Result<UserRecord, ApiError> {
    let response: LoginResponse = client.post_json(LOGIN_PATH, &LoginRequest { email, password }).await?;
    establish(session, response)
}

/// Exchange a Google identity credential for a session and log it in.
///
/// # Errors
///
/// Same as [`login_with_password`].
pub async fn login_with_google(
    client: &ApiClient,
    session: &SessionStore,
    credential: &str,
) -> Result<UserRecord, ApiError> {
    let response: LoginResponse = client.post_json(GOOGLE_LOGIN_PATH, &GoogleLoginRequest { credential }).await?;
    establish(session, response)
}

fn establish(session: &SessionStore, response: LoginResponse) -> Result<UserRecord, ApiError> {
    let LoginResponse { token, user } = response;
    session.login(user.clone(), Some(token))?;
    info!(role = %user.role, "backend login accepted");
    Ok(user)
}

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn register_user(client: &ApiClient, user: &NewUser) -> Result<UserRecord, ApiError> {
    client.post_json(USER_SAVE_PATH, user).await
}

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn users_by_role(client: &ApiClient, role: Role) -> Result<Vec<UserRecord>, ApiError> {
    client.get_json(&users_by_role_path(role)).await
}

// =============================================================================
// ASSETS
// =============================================================================

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn list_assets(client: &ApiClient) -> Result<Vec<Asset>, ApiError> {
    client.get_json(ASSET_ALL_PATH).await
}

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn create_asset(client: &ApiClient, asset: &NewAsset) -> Result<Asset, ApiError> {
    client.post_json(ASSET_SAVE_PATH, asset).await
}

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn update_asset(client: &ApiClient, id: &EntityId, asset: &Asset) -> Result<Asset, ApiError> {
    client.put_json(&asset_update_path(id), asset).await
}

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn delete_asset(client: &ApiClient, id: &EntityId) -> Result<(), ApiError> {
    client.delete(&asset_delete_path(id)).await
}

// =============================================================================
// WORK ORDERS
// =============================================================================

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn list_work_orders(client: &ApiClient) -> Result<Vec<WorkOrder>, ApiError> {
    client.get_json(WORKORDER_ALL_PATH).await
}

/// Work orders requested by or assigned to `user_id`.
///
/// # Errors
///
/// Returns the backend error unchanged.
pub async fn work_orders_for_user(client: &ApiClient, user_id: &EntityId) -> Result<Vec<WorkOrder>, ApiError> {
    client.get_json(&workorders_for_user_path(user_id)).await
}

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn create_work_order(client: &ApiClient, order: &WorkOrder) -> Result<WorkOrder, ApiError> {
    client.post_json(WORKORDER_SAVE_PATH, order).await
}

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn update_work_order(client: &ApiClient, id: &EntityId, order: &WorkOrder) -> Result<WorkOrder, ApiError> {
    client.put_json(&workorder_update_path(id), order).await
}

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn update_work_order_status(client: &ApiClient, id: &EntityId, status: &str) -> Result<WorkOrder, ApiError> {
    client.put_json(&workorder_status_path(id), &StatusUpdate { status }).await
}

/// File a completion report. The response body is ignored.
///
/// # Errors
///
/// Returns the backend error unchanged.
pub async fn submit_task_report(client: &ApiClient, report: &TaskReport) -> Result<(), ApiError> {
    client.request_text(Method::POST, TASK_SAVE_PATH, Some(report)).await.map(|_| ())
}

// =============================================================================
// PLANS
// =============================================================================

/// # Errors
///
/// Returns the backend error unchanged.
pub async fn list_maintenance_plans(client: &ApiClient) -> Result<Vec<MaintenancePlan>, ApiError> {
    client.get_json(MAINTENANCE_PLAN_ALL_PATH).await
}
