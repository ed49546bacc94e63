//! Collaborator traits for external identity backends. Implementations own any
//! network I/O and are responsible for bounding the duration of a single call.

use super::entry::DirectoryEntry;
use super::classifier::Signal;
use crate::error::{AuthError, DirectoryError};

pub trait Directory: Send + Sync {
    fn id(&self) -> &str;

    /// Look a user up by name. An empty result means "not found", not an error.
    fn find_user(&self, username: &str) -> Result<Vec<DirectoryEntry>, DirectoryError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    Timeout,
}

impl AuthOutcome {
    pub fn signal(self) -> Signal {
        match self {
            AuthOutcome::Success => Signal::Success,
            AuthOutcome::Timeout => Signal::Timeout,
        }
    }
}

pub trait Authenticator: Send + Sync {
    fn id(&self) -> &str;

    fn authenticate(&self, entry: &DirectoryEntry, password: &str) -> Result<AuthOutcome, AuthError>;
}
