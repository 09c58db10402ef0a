use super::*;

// =============================================================================
// Role
// =============================================================================

#[test]
fn role_deserializes_known_values() {
    let roles: Vec<Role> = serde_json::from_str(r#"["user","technician","supervisor","admin"]"#).unwrap();
    assert_eq!(roles, vec![Role::User, Role::Technician, Role::Supervisor, Role::Admin]);
}

#[test]
fn role_unknown_value_maps_to_unknown() {
    let role: Role = serde_json::from_str(r#""manager""#).unwrap();
    assert_eq!(role, Role::Unknown);
}

#[test]
fn role_from_str_is_case_insensitive() {
    assert_eq!("Supervisor".parse::<Role>(), Ok(Role::Supervisor));
    assert_eq!(" admin ".parse::<Role>(), Ok(Role::Admin));
    assert!("janitor".parse::<Role>().is_err());
}

#[test]
fn default_permissions_match_role_table() {
    assert_eq!(Role::Admin.default_permissions().len(), 6);
    assert!(Role::Supervisor.default_permissions().contains(&"technician_oversight"));
    assert_eq!(Role::Technician.default_permissions(), &["work_orders", "view_reports"]);
    assert_eq!(Role::User.default_permissions(), &["view_reports"]);
    assert!(Role::Unknown.default_permissions().is_empty());
}

// =============================================================================
// UserRecord
// =============================================================================

#[test]
fn minimal_record_parses_with_defaults() {
    let user: UserRecord = serde_json::from_str(r#"{"id":1,"role":"admin"}"#).unwrap();
    assert_eq!(user.id, Some(EntityId::Number(1)));
    assert_eq!(user.role, Role::Admin);
    assert_eq!(user.name, "");
    assert_eq!(user.profile, UserProfile::default());
    assert!(user.permissions.is_none());
}

#[test]
fn missing_or_null_role_is_unknown() {
    let missing: UserRecord = serde_json::from_str(r#"{"id":2}"#).unwrap();
    let null: UserRecord = serde_json::from_str(r#"{"id":2,"role":null}"#).unwrap();
    assert_eq!(missing.role, Role::Unknown);
    assert_eq!(null.role, Role::Unknown);
}

#[test]
fn profile_fields_accept_numbers_and_strings() {
    let user: UserRecord = serde_json::from_str(
        r#"{"id":"T-001","name":"Alice","email":"a@x.com","role":"technician",
            "phno":9876543210,"pincode":"600001","skill":"HVAC","region":"North Zone","location":"Chennai"}"#,
    )
    .unwrap();
    assert_eq!(user.id, Some(EntityId::Text("T-001".into())));
    assert_eq!(user.profile.phno.as_deref(), Some("9876543210"));
    assert_eq!(user.profile.pincode.as_deref(), Some("600001"));
    assert_eq!(user.profile.skill.as_deref(), Some("HVAC"));
    assert_eq!(user.profile.location.as_deref(), Some("Chennai"));
}

#[test]
fn profile_is_flattened_when_serialized() {
    let mut user = UserRecord::local("Bob", "bob@x.com", Role::User);
    user.profile.region = Some("South Zone".into());
    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["region"], "South Zone");
    assert_eq!(value["role"], "user");
    assert!(value.get("profile").is_none());
    assert!(value.get("id").is_none());
}

#[test]
fn local_user_carries_role_permissions() {
    let user = UserRecord::local("Root", "root@x.com", Role::Admin);
    assert!(user.has_permission("system_config"));
    assert!(!user.has_permission("launch_rockets"));
}

#[test]
fn has_permission_is_false_without_list() {
    let user: UserRecord = serde_json::from_str(r#"{"id":3,"role":"admin"}"#).unwrap();
    assert!(!user.has_permission("user_management"));
}

#[test]
fn display_name_falls_back_for_blank_names() {
    let user: UserRecord = serde_json::from_str(r#"{"name":"  "}"#).unwrap();
    assert_eq!(user.display_name(), "Demo User");
    assert_eq!(UserRecord::local("Eva", "e@x.com", Role::User).display_name(), "Eva");
}

// =============================================================================
// EntityId
// =============================================================================

#[test]
fn entity_id_from_str_prefers_numbers() {
    assert_eq!(EntityId::from("42"), EntityId::Number(42));
    assert_eq!(EntityId::from("WO001"), EntityId::Text("WO001".into()));
    assert_eq!(EntityId::from("WO001").to_string(), "WO001");
    assert_eq!(EntityId::Number(7).to_string(), "7");
}
