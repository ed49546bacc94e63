//! Ordered catalogue of configured directories and the authenticators bound to them.

use std::sync::Arc;
use tracing::debug;

use super::backend::{Authenticator, Directory};
use crate::error::{AppError, AppResult};

struct AuthenticatorBinding {
    authenticator: Arc<dyn Authenticator>,
    directory_ids: Vec<String>,
}

#[derive(Default)]
pub struct IdentityRegistry {
    directories: Vec<Arc<dyn Directory>>,
    authenticators: Vec<AuthenticatorBinding>,
}

impl IdentityRegistry {
    pub fn new() -> Self { Self::default() }

    /// Register a directory. Query order is registration order.
    pub fn register_directory(&mut self, directory: Arc<dyn Directory>) -> AppResult<()> {
        if self.directories.iter().any(|d| d.id() == directory.id()) {
            return Err(AppError::conflict("duplicate_directory".to_string(), format!("directory '{}' already registered", directory.id())));
        }
        debug!(target: "strongbox::config", "registry.directory id={}", directory.id());
        self.directories.push(directory);
        Ok(())
    }

    /// Register an authenticator bound to one or more already-registered directories.
    pub fn register_authenticator(&mut self, authenticator: Arc<dyn Authenticator>, directory_ids: &[&str]) -> AppResult<()> {
        if self.authenticators.iter().any(|a| a.authenticator.id() == authenticator.id()) {
            return Err(AppError::conflict("duplicate_authenticator".to_string(), format!("authenticator '{}' already registered", authenticator.id())));
        }
        if let Some(missing) = directory_ids.iter().find(|id| !self.directories.iter().any(|d| d.id() == **id)) {
            return Err(AppError::not_found("unknown_directory".to_string(), format!("authenticator '{}' bound to unknown directory '{}'", authenticator.id(), missing)));
        }
        debug!(target: "strongbox::config", "registry.authenticator id={} directories={:?}", authenticator.id(), directory_ids);
        self.authenticators.push(AuthenticatorBinding {
            authenticator,
            directory_ids: directory_ids.iter().map(|s| s.to_string()).collect(),
        });
        Ok(())
    }

    pub fn directories(&self) -> Vec<&dyn Directory> {
        self.directories.iter().map(|d| d.as_ref()).collect()
    }

    /// Authenticators bound to `directory_id`, in registration order.
    pub fn authenticators_for(&self, directory_id: &str) -> Vec<&dyn Authenticator> {
        self.authenticators
            .iter()
            .filter(|a| a.directory_ids.iter().any(|d| d == directory_id))
            .map(|a| a.authenticator.as_ref())
            .collect()
    }

    pub fn directory_count(&self) -> usize { self.directories.len() }

    pub fn authenticator_count(&self) -> usize { self.authenticators.len() }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod registry_tests;
