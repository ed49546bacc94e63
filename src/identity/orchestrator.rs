//! Verify a password for a resolved entry against an ordered chain of
//! authenticators. The first terminal answer wins; everything else is absorbed.

use tracing::{debug, info, warn};

use super::backend::Authenticator;
use super::classifier::{Action, Backend, ClassificationTable};
use super::entry::DirectoryEntry;
use super::rounds::{run_rounds, ErrorLedger, RetryBudget, RoundHandler, RoundOutcome, Step, WorkingSet};

#[derive(Debug, Clone, Default)]
pub struct AuthenticationOrchestrator {
    table: ClassificationTable,
}

struct Attempt<'t> {
    entry: &'t DirectoryEntry,
    password: &'t str,
    table: &'t ClassificationTable,
    ledger: ErrorLedger,
}

impl<'a> RoundHandler<&'a dyn Authenticator> for Attempt<'_> {
    fn attempt(&mut self, auth: &&'a dyn Authenticator, budget: &RetryBudget) -> Step {
        let (signal, err) = match auth.authenticate(self.entry, self.password) {
            Ok(outcome) => (outcome.signal(), None),
            Err(e) => (e.signal(), Some(e)),
        };
        let action = self.table.classify(Backend::Authenticator, signal);
        let user = self.entry.identity();
        match action {
            Action::TerminalTrue => {
                debug!(target: "strongbox::authenticate", "auth.accepted authenticator={} user={} round={}", auth.id(), user, budget.round());
            }
            Action::TerminalFalse => {
                info!(target: "strongbox::authenticate", "auth.rejected authenticator={} user={} round={}", auth.id(), user, budget.round());
            }
            Action::Retry => {
                debug!(target: "strongbox::authenticate", "auth.retryable authenticator={} user={} round={} signal={:?}", auth.id(), user, budget.round(), signal);
            }
            Action::DropSilent => {
                debug!(target: "strongbox::authenticate", "auth.not_applicable authenticator={} user={} signal={:?}", auth.id(), user, signal);
            }
            Action::DropNoteworthy => {
                debug!(target: "strongbox::authenticate", "auth.drop authenticator={} user={} signal={:?}", auth.id(), user, signal);
                match err {
                    Some(e) => self.ledger.record(auth.id(), e),
                    None => self.ledger.record(auth.id(), format!("unexpected outcome {:?}", signal)),
                }
            }
        }
        Step::Act(action)
    }

    fn exhausted(&mut self, auth: &&'a dyn Authenticator, budget: &RetryBudget) {
        debug!(
            target: "strongbox::authenticate",
            "auth.retries_exhausted authenticator={} user={} attempts={}",
            auth.id(), self.entry.identity(), budget.max_retries() + 1
        );
    }
}

impl AuthenticationOrchestrator {
    pub fn new(table: ClassificationTable) -> Self { Self { table } }

    /// Returns true as soon as any authenticator accepts the password and false as
    /// soon as one rejects it. Success abandons any retries still pending for
    /// earlier authenticators.
    pub fn authenticate(
        &self,
        entry: &DirectoryEntry,
        password: &str,
        authenticators: &[&dyn Authenticator],
        max_retries: u32,
    ) -> bool {
        let mut set = WorkingSet::new(authenticators.iter().copied());
        let mut attempt = Attempt { entry, password, table: &self.table, ledger: ErrorLedger::new() };
        match run_rounds(&mut set, max_retries, &mut attempt) {
            RoundOutcome::Terminal { action: Action::TerminalTrue, .. } => true,
            RoundOutcome::Terminal { .. } => false,
            RoundOutcome::Drained { rounds } => {
                if !attempt.ledger.is_empty() {
                    warn!(
                        target: "strongbox::authenticate",
                        "auth.failed user={} rounds={} errors={} [{}]",
                        entry.identity(), rounds, attempt.ledger.len(), attempt.ledger.summary()
                    );
                } else {
                    debug!(target: "strongbox::authenticate", "auth.failed user={} rounds={}", entry.identity(), rounds);
                }
                false
            }
        }
    }
}
