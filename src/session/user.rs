//! Authenticated principal record and role metadata.
//!
//! DESIGN
//! ======
//! The backend returns users as flat JSON objects with a handful of known
//! profile fields. The record keeps the required identity fields at the top
//! level and flattens the typed profile back into the same object, so the
//! persisted form matches what the backend sends.

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier. Persisted entities carry numeric ids while seeded and
/// demo data use string ids such as `"WO001"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        value.parse::<i64>().map_or_else(|_| Self::Text(value.to_owned()), Self::Number)
    }
}

/// Application role. Anything the backend sends outside the four known
/// roles is kept as `Unknown` and routed like a plain user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Technician,
    Supervisor,
    Admin,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Technician => "technician",
            Self::Supervisor => "supervisor",
            Self::Admin => "admin",
            Self::Unknown => "unknown",
        }
    }

    /// Capabilities granted to locally created users of this role.
    #[must_use]
    pub fn default_permissions(self) -> &'static [&'static str] {
        match self {
            Self::Admin => &[
                "user_management",
                "asset_management",
                "work_orders",
                "reports",
                "system_config",
                "technician_oversight",
            ],
            Self::Supervisor => &["asset_management", "work_orders", "reports", "technician_oversight"],
            Self::Technician => &["work_orders", "view_reports"],
            Self::User => &["view_reports"],
            Self::Unknown => &[],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "technician" => Ok(Self::Technician),
            "supervisor" => Ok(Self::Supervisor),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Optional profile fields shown by the dashboards. Opaque to the session core.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "deserialize_opt_string_from_scalar", skip_serializing_if = "Option::is_none")]
    pub phno: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string_from_scalar", skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// The authenticated principal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: Role,
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl UserRecord {
    /// A user created without the backend (e.g. self-registration), carrying
    /// the default permissions for `role`.
    #[must_use]
    pub fn local(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            role,
            profile: UserProfile::default(),
            permissions: Some(role.default_permissions().iter().map(|p| (*p).to_owned()).collect()),
        }
    }

    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|perms| perms.iter().any(|p| p == permission))
    }

    /// Name for greetings; falls back like the dashboards do.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() { "Demo User" } else { &self.name }
    }
}

fn deserialize_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Role>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn deserialize_opt_string_from_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("expected a string or number, got {other}"))),
    }
}
