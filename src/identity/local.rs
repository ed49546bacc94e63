//! In-process backends: a user table held in memory and an Argon2 verifier that
//! checks the PHC hash carried on the entry itself.

use anyhow::{anyhow, Result};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use parking_lot::RwLock;
use password_hash::{PasswordHash, SaltString};

use super::backend::{AuthOutcome, Authenticator, Directory};
use super::entry::DirectoryEntry;
use crate::error::{AuthError, DirectoryError};

/// Property key holding an Argon2 PHC string.
pub const PASSWORD_HASH_PROPERTY: &str = "password_hash";

pub fn hash_password(password: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let phc = Argon2::default().hash_password(password.as_bytes(), &salt).map_err(|e| anyhow!(e.to_string()))?.to_string();
    Ok(phc)
}

pub struct LocalDirectory {
    id: String,
    org: Option<String>,
    entries: RwLock<Vec<DirectoryEntry>>,
}

impl LocalDirectory {
    pub fn new(id: impl Into<String>) -> Self { Self { id: id.into(), org: None, entries: RwLock::new(Vec::new()) } }

    /// Directory serving a single org: entries without their own `org` property
    /// are returned mapped to it.
    pub fn in_org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    pub fn org(&self) -> Option<&str> { self.org.as_deref() }

    /// Add a user; the entry is re-owned by this directory.
    pub fn add_entry(&self, identity: &str, properties: impl IntoIterator<Item = (String, String)>) {
        let mut entry = DirectoryEntry::new(self.id.clone(), identity);
        entry.properties.extend(properties);
        let mut w = self.entries.write();
        w.retain(|e| !e.identity.eq_ignore_ascii_case(identity));
        w.push(entry);
    }

    pub fn remove_user(&self, identity: &str) -> bool {
        let mut w = self.entries.write();
        let before = w.len();
        w.retain(|e| !e.identity.eq_ignore_ascii_case(identity));
        w.len() != before
    }

    pub fn len(&self) -> usize { self.entries.read().len() }

    pub fn is_empty(&self) -> bool { self.entries.read().is_empty() }
}

impl Directory for LocalDirectory {
    fn id(&self) -> &str { &self.id }

    fn find_user(&self, username: &str) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        Ok(self
            .entries
            .read()
            .iter()
            .filter(|e| e.identity.eq_ignore_ascii_case(username))
            .map(|e| match (&self.org, e.org_mapping()) {
                (Some(org), None) => e.clone().with_org(org.clone()),
                _ => e.clone(),
            })
            .collect())
    }
}

pub struct Argon2Authenticator {
    id: String,
}

impl Argon2Authenticator {
    pub fn new(id: impl Into<String>) -> Self { Self { id: id.into() } }
}

impl Authenticator for Argon2Authenticator {
    fn id(&self) -> &str { &self.id }

    fn authenticate(&self, entry: &DirectoryEntry, password: &str) -> Result<AuthOutcome, AuthError> {
        let Some(phc) = entry.property(PASSWORD_HASH_PROPERTY) else {
            return Err(AuthError::UserNotFound(entry.identity().to_string()));
        };
        let parsed = PasswordHash::new(phc).map_err(|e| AuthError::Generic(format!("unreadable hash for {}: {}", entry.identity(), e)))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(AuthOutcome::Success),
            Err(password_hash::Error::Password) => Err(AuthError::PasswordAuthFailed(entry.identity().to_string())),
            Err(e) => Err(AuthError::Generic(e.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod local_tests;
