use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Property key holding the org an entry belongs to.
pub const ORG_PROPERTY: &str = "org";

/// One identity record as returned by exactly one directory.
///
/// Two entries are equal when they come from the same directory and carry the same
/// identity; properties do not take part. Identical identities from different
/// directories are therefore distinct candidates and trip the uniqueness check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub directory_id: String,
    pub identity: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl DirectoryEntry {
    pub fn new(directory_id: impl Into<String>, identity: impl Into<String>) -> Self {
        Self { directory_id: directory_id.into(), identity: identity.into(), properties: BTreeMap::new() }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_org(self, org: impl Into<String>) -> Self { self.with_property(ORG_PROPERTY, org) }

    pub fn identity(&self) -> &str { &self.identity }

    pub fn property(&self, key: &str) -> Option<&str> { self.properties.get(key).map(|s| s.as_str()) }

    pub fn org_mapping(&self) -> Option<&str> { self.property(ORG_PROPERTY) }
}

impl PartialEq for DirectoryEntry {
    fn eq(&self, other: &Self) -> bool {
        self.directory_id == other.directory_id && self.identity == other.identity
    }
}

impl Eq for DirectoryEntry {}

impl Hash for DirectoryEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.directory_id.hash(state);
        self.identity.hash(state);
    }
}
