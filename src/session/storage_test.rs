use super::*;

fn temp_session_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("uamt-storage-test-{}", uuid::Uuid::new_v4()))
        .join("session.json")
}

// =============================================================================
// MemoryStorage
// =============================================================================

#[test]
fn memory_set_get_remove() {
    let storage = MemoryStorage::new();
    assert!(storage.is_empty());
    storage.set(AUTH_TOKEN_KEY, "abc").unwrap();
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    storage.set(AUTH_TOKEN_KEY, "def").unwrap();
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("def"));
    assert_eq!(storage.len(), 1);
    storage.remove(AUTH_TOKEN_KEY).unwrap();
    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
}

#[test]
fn memory_remove_missing_key_is_ok() {
    let storage = MemoryStorage::new();
    assert!(storage.remove(USER_KEY).is_ok());
}

// =============================================================================
// FileStorage
// =============================================================================

#[test]
fn file_get_on_missing_file_is_none() {
    let storage = FileStorage::new(temp_session_file());
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
}

#[test]
fn file_values_survive_a_new_instance() {
    let path = temp_session_file();
    let first = FileStorage::new(&path);
    first.set(AUTH_TOKEN_KEY, "abc").unwrap();
    first.set(USER_KEY, r#"{"id":1,"role":"admin"}"#).unwrap();

    let second = FileStorage::new(&path);
    assert_eq!(second.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    assert_eq!(second.get(USER_KEY).unwrap().as_deref(), Some(r#"{"id":1,"role":"admin"}"#));

    second.remove(AUTH_TOKEN_KEY).unwrap();
    assert_eq!(first.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert!(first.get(USER_KEY).unwrap().is_some());
}

#[test]
fn file_write_leaves_no_temp_file() {
    let path = temp_session_file();
    let storage = FileStorage::new(&path);
    storage.set(IS_AUTHENTICATED_KEY, "true").unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn file_corrupt_contents_surface_as_error() {
    let path = temp_session_file();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{not json").unwrap();
    let storage = FileStorage::new(&path);
    let err = storage.get(USER_KEY).unwrap_err();
    assert!(matches!(err, StorageError::Corrupt { .. }));
}

#[test]
fn file_corrupt_contents_are_replaced_on_write() {
    let path = temp_session_file();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{not json").unwrap();
    let storage = FileStorage::new(&path);

    storage.remove(AUTH_TOKEN_KEY).unwrap();

    assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "{}");
}

#[test]
fn file_empty_contents_read_as_empty() {
    let path = temp_session_file();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "  \n").unwrap();
    let storage = FileStorage::new(&path);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);
}

#[cfg(unix)]
#[test]
fn file_is_private_to_owner() {
    use std::os::unix::fs::PermissionsExt;

    let path = temp_session_file();
    FileStorage::new(&path).set(AUTH_TOKEN_KEY, "secret").unwrap();
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
