use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{info, info_span, warn};

use super::classifier::ClassificationTable;
use super::correlation::CorrelationId;
use super::orchestrator::AuthenticationOrchestrator;
use super::principal::{Attrs, Principal};
use super::registry::IdentityRegistry;
use super::resolver::DirectoryResolver;
use crate::config::{EffectiveAuthConfig, GlobalAuthConfig, OrgAuthConfig};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub org: Option<String>,
    pub ip: Option<String>,
    pub request_id: Option<String>,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into(), org: None, ip: None, request_id: None }
    }

    pub fn in_org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub principal: Principal,
    pub authenticated_at: DateTime<Utc>,
    pub correlation_id: CorrelationId,
}

pub trait AuthProvider: Send + Sync {
    fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse>;
}

/// Resolves the user across the registered directories, then checks the password
/// with the authenticators bound to the directory that produced the entry.
pub struct FederatedAuthProvider {
    registry: IdentityRegistry,
    global: GlobalAuthConfig,
    orgs: BTreeMap<String, OrgAuthConfig>,
    resolver: DirectoryResolver,
    orchestrator: AuthenticationOrchestrator,
}

impl FederatedAuthProvider {
    pub fn new(registry: IdentityRegistry, global: GlobalAuthConfig) -> Self {
        Self {
            registry,
            global,
            orgs: BTreeMap::new(),
            resolver: DirectoryResolver::default(),
            orchestrator: AuthenticationOrchestrator::default(),
        }
    }

    pub fn with_org_config(mut self, org: impl Into<String>, cfg: OrgAuthConfig) -> Self {
        self.orgs.insert(org.into(), cfg);
        self
    }

    pub fn with_classification(mut self, table: ClassificationTable) -> Self {
        self.resolver = DirectoryResolver::new(table.clone());
        self.orchestrator = AuthenticationOrchestrator::new(table);
        self
    }

    pub fn registry(&self) -> &IdentityRegistry { &self.registry }

    pub fn effective_config(&self, org: Option<&str>) -> EffectiveAuthConfig {
        EffectiveAuthConfig::from_layers(&self.global, org.and_then(|o| self.orgs.get(o)))
    }
}

impl AuthProvider for FederatedAuthProvider {
    fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse> {
        let corr = CorrelationId::from_opt_str(req.request_id.as_deref());
        let span = info_span!(target: "strongbox::login", "login", corr = %corr);
        let _enter = span.enter();

        let eff = self.effective_config(req.org.as_deref());
        let directories = self.registry.directories();
        let entry = match self.resolver.resolve(&req.username, &directories, req.org.as_deref(), eff.directory_max_retries) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                info!(target: "strongbox::login", "login.unresolved user={} org={:?}", req.username, req.org);
                return Err(AppError::invalid_credentials());
            }
            Err(e) => {
                // Ambiguity is a data problem for operators, not something to reveal upstream.
                warn!(target: "strongbox::login", "login.ambiguous org={:?} err={}", req.org, e);
                return Err(AppError::invalid_credentials());
            }
        };

        let authenticators = self.registry.authenticators_for(&entry.directory_id);
        if !self.orchestrator.authenticate(&entry, &req.password, &authenticators, eff.authenticator_max_retries) {
            info!(target: "strongbox::login", "login.denied user={} directory={} authenticators={}", entry.identity(), entry.directory_id, authenticators.len());
            return Err(AppError::invalid_credentials());
        }

        let org_id = entry.org_mapping().map(str::to_string);
        let principal = Principal {
            user_id: entry.identity().to_string(),
            roles: vec!["user".into()],
            attrs: Attrs { org_id, directory_id: Some(entry.directory_id.clone()), ip: req.ip.clone() },
        };
        info!(target: "strongbox::login", "login.ok user={} directory={}", principal.user_id, entry.directory_id);
        Ok(LoginResponse { principal, authenticated_at: Utc::now(), correlation_id: corr })
    }
}
