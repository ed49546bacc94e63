//! strongbox: federated identity resolution and authentication for a multi-tenant
//! backup service. Users live in per-org external directories; credentials are
//! checked by authenticators bound to those directories.

pub mod config;
pub mod error;
pub mod identity;
