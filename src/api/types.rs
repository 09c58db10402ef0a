//! Wire types for the maintenance backend.
//!
//! DESIGN
//! ======
//! The backend is loose about shapes: ids arrive as numbers or strings,
//! optional fields are sometimes `""` and records carry extra fields this
//! client does not model. Every DTO therefore defaults missing fields and
//! keeps unknown ones in `extra` so an update sends back what it received.

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::session::{
    StorageError,
    user::{EntityId, Role, UserProfile, UserRecord, deserialize_opt_string_from_scalar},
};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    HttpClientBuild(String),
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} rejected the session (401)")]
    Unauthorized { path: String },
    #[error("{path} returned {status}: {body}")]
    Status { path: String, status: u16, body: String },
    #[error("unexpected response from {path}: {message}")]
    Decode { path: String, message: String },
    #[error("session could not be saved: {0}")]
    Session(#[from] StorageError),
}

impl ApiError {
    /// HTTP status carried by the error, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct GoogleLoginRequest<'a> {
    pub credential: &'a str,
}

/// Body of a successful login: the bearer token and the principal.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserRecord,
}

/// Registration payload for `POST /user/save`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    #[serde(flatten)]
    pub profile: UserProfile,
}

// =============================================================================
// ASSETS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Asset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub site_code: String,
    pub description: String,
    pub count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload for `POST /asset/save`; the backend assigns the id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub site_code: String,
    pub description: String,
    pub count: u32,
    pub reg_date: String,
}

// =============================================================================
// WORK ORDERS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_by_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkOrder {
    /// Assignee identity: the technician id, or the assignee name when the
    /// id is missing or blank. `None` for unassigned orders.
    #[must_use]
    pub fn assignee_key(&self) -> Option<String> {
        let id = self.assigned_to_id.as_ref().map(ToString::to_string).filter(|s| !s.trim().is_empty());
        id.or_else(|| self.assigned_to.clone().filter(|s| !s.trim().is_empty()))
    }
}

/// Body of `PUT /workorder/updateStatus/{id}`.
#[derive(Clone, Debug, Serialize)]
pub struct StatusUpdate<'a> {
    pub status: &'a str,
}

// =============================================================================
// PLANS AND TASKS
// =============================================================================

/// Maintenance frequency: a day count from the backend, or a label typed by
/// a user (`"Monthly"`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Frequency {
    Days(u32),
    Label(String),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenancePlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_order_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_maintenance_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Completion report filed with `POST /task/save` when a technician
/// closes a work order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    #[serde(rename = "descrip", default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_opt_string_from_scalar")]
    pub est_hours: Option<String>,
    pub technician_id: EntityId,
    pub work_id: EntityId,
    pub completed_date: String,
}
