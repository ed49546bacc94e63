//! Federated identity resolution and authentication.
//! Keep the public surface thin and split implementation across sub-modules.

mod backend;
mod classifier;
mod correlation;
mod entry;
mod local;
mod orchestrator;
mod principal;
mod provider;
mod registry;
mod resolver;
pub mod rounds;

pub use backend::{AuthOutcome, Authenticator, Directory};
pub use classifier::{Action, Backend, ClassificationTable, Signal};
pub use correlation::CorrelationId;
pub use entry::{DirectoryEntry, ORG_PROPERTY};
pub use local::{hash_password, Argon2Authenticator, LocalDirectory, PASSWORD_HASH_PROPERTY};
pub use orchestrator::AuthenticationOrchestrator;
pub use principal::{Attrs, Principal};
pub use provider::{AuthProvider, FederatedAuthProvider, LoginRequest, LoginResponse};
pub use registry::IdentityRegistry;
pub use resolver::DirectoryResolver;
