use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AppResult;
use crate::identity::{Argon2Authenticator, IdentityRegistry, LocalDirectory};

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const ENV_DIRECTORY_RETRIES: &str = "STRONGBOX_DIRECTORY_RETRIES";
pub const ENV_AUTH_RETRIES: &str = "STRONGBOX_AUTH_RETRIES";

/// Retry settings applied to every org unless overridden.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalAuthConfig {
    pub directory_max_retries: u32,
    pub authenticator_max_retries: u32,
}

impl Default for GlobalAuthConfig {
    fn default() -> Self {
        Self { directory_max_retries: DEFAULT_MAX_RETRIES, authenticator_max_retries: DEFAULT_MAX_RETRIES }
    }
}

impl GlobalAuthConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self { Self::default().with_overrides(|k| std::env::var(k).ok()) }

    /// Overlay values found through `lookup`; unparsable values keep the current setting.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str, cur: u32| -> u32 {
            match lookup(key) {
                Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
                    warn!(target: "strongbox::config", "config.ignored key={} value='{}'", key, raw);
                    cur
                }),
                None => cur,
            }
        };
        self.directory_max_retries = parse(ENV_DIRECTORY_RETRIES, self.directory_max_retries);
        self.authenticator_max_retries = parse(ENV_AUTH_RETRIES, self.authenticator_max_retries);
        self
    }
}

/// Per-org overrides. Unspecified values inherit from Global.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrgAuthConfig {
    pub directory_max_retries: Option<u32>,
    pub authenticator_max_retries: Option<u32>,
}

/// Fully resolved settings used for one login.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EffectiveAuthConfig {
    pub directory_max_retries: u32,
    pub authenticator_max_retries: u32,
}

impl EffectiveAuthConfig {
    pub fn from_layers(global: &GlobalAuthConfig, org: Option<&OrgAuthConfig>) -> Self {
        let directory_max_retries = org.and_then(|o| o.directory_max_retries).unwrap_or(global.directory_max_retries);
        let authenticator_max_retries = org.and_then(|o| o.authenticator_max_retries).unwrap_or(global.authenticator_max_retries);
        Self { directory_max_retries, authenticator_max_retries }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalUserConfig {
    pub identity: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalDirectoryConfig {
    pub id: String,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub users: Vec<LocalUserConfig>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticatorKind {
    #[default]
    Argon2,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatorConfig {
    pub id: String,
    #[serde(default)]
    pub kind: AuthenticatorKind,
    pub directories: Vec<String>,
}

/// On-disk federation description: retry layers plus the backends to register.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FederationConfig {
    pub global: GlobalAuthConfig,
    pub orgs: BTreeMap<String, OrgAuthConfig>,
    pub directories: Vec<LocalDirectoryConfig>,
    pub authenticators: Vec<AuthenticatorConfig>,
}

impl FederationConfig {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading federation config {}", path.display()))?;
        let cfg: FederationConfig = serde_json::from_str(&text).with_context(|| format!("parsing federation config {}", path.display()))?;
        info!(
            target: "strongbox::config",
            "config.loaded path={} directories={} authenticators={} orgs={}",
            path.display(), cfg.directories.len(), cfg.authenticators.len(), cfg.orgs.len()
        );
        Ok(cfg)
    }

    pub fn build_registry(&self) -> AppResult<IdentityRegistry> {
        let mut reg = IdentityRegistry::new();
        for d in &self.directories {
            let mut dir = LocalDirectory::new(d.id.clone());
            if let Some(org) = &d.org {
                dir = dir.in_org(org.clone());
            }
            for u in &d.users {
                dir.add_entry(&u.identity, u.properties.clone());
            }
            reg.register_directory(Arc::new(dir))?;
        }
        for a in &self.authenticators {
            let ids: Vec<&str> = a.directories.iter().map(|s| s.as_str()).collect();
            match a.kind {
                AuthenticatorKind::Argon2 => reg.register_authenticator(Arc::new(Argon2Authenticator::new(a.id.clone())), &ids)?,
            }
        }
        Ok(reg)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
