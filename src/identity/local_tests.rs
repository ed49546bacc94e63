use super::*;

#[test]
fn find_user_is_case_insensitive() {
    let d = LocalDirectory::new("local");
    d.add_entry("Alice", vec![("org".to_string(), "acme".to_string())]);
    let found = d.find_user("alice").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].directory_id, "local");
    assert_eq!(found[0].org_mapping(), Some("acme"));
    assert!(d.find_user("bob").unwrap().is_empty());
}

#[test]
fn add_entry_replaces_and_remove_user_drops() {
    let d = LocalDirectory::new("local");
    d.add_entry("alice", vec![]);
    d.add_entry("ALICE", vec![]);
    assert_eq!(d.len(), 1);
    assert!(d.remove_user("alice"));
    assert!(!d.remove_user("alice"));
    assert!(d.is_empty());
}

#[test]
fn argon2_accepts_and_rejects() {
    let phc = hash_password("s3cret").unwrap();
    let entry = DirectoryEntry::new("local", "alice").with_property(PASSWORD_HASH_PROPERTY, phc);
    let a = Argon2Authenticator::new("argon2");
    assert_eq!(a.authenticate(&entry, "s3cret"), Ok(AuthOutcome::Success));
    assert!(matches!(a.authenticate(&entry, "nope"), Err(AuthError::PasswordAuthFailed(_))));
}

#[test]
fn argon2_without_hash_does_not_know_the_user() {
    let entry = DirectoryEntry::new("local", "alice");
    let a = Argon2Authenticator::new("argon2");
    assert!(matches!(a.authenticate(&entry, "x"), Err(AuthError::UserNotFound(_))));
}

#[test]
fn argon2_with_garbage_hash_is_generic() {
    let entry = DirectoryEntry::new("local", "alice").with_property(PASSWORD_HASH_PROPERTY, "not-a-phc");
    let a = Argon2Authenticator::new("argon2");
    assert!(matches!(a.authenticate(&entry, "x"), Err(AuthError::Generic(_))));
}

#[test]
fn directory_org_fills_unmapped_entries_only() {
    let d = LocalDirectory::new("ldap-acme").in_org("Acme");
    d.add_entry("alice", vec![]);
    d.add_entry("bob", vec![("org".to_string(), "Globex".to_string())]);
    assert_eq!(d.org(), Some("Acme"));
    assert_eq!(d.find_user("alice").unwrap()[0].org_mapping(), Some("Acme"));
    assert_eq!(d.find_user("bob").unwrap()[0].org_mapping(), Some("Globex"));
}
