//! Resolve a username to at most one directory entry across an ordered list of
//! unreliable directories.

use std::collections::HashSet;
use tracing::{debug, info};

use super::backend::Directory;
use super::classifier::{Action, Backend, ClassificationTable};
use super::entry::DirectoryEntry;
use super::rounds::{run_rounds, ErrorLedger, RetryBudget, RoundHandler, RoundOutcome, Step, WorkingSet};
use crate::error::ResolveError;

#[derive(Debug, Clone, Default)]
pub struct DirectoryResolver {
    table: ClassificationTable,
}

/// Per-call state: collected candidates plus the diagnostics ledger.
struct Resolution<'t> {
    username: &'t str,
    table: &'t ClassificationTable,
    seen: HashSet<DirectoryEntry>,
    candidates: Vec<DirectoryEntry>,
    ledger: ErrorLedger,
}

impl Resolution<'_> {
    fn add(&mut self, entry: DirectoryEntry) {
        if self.seen.insert(entry.clone()) { self.candidates.push(entry); }
    }
}

impl<'d> RoundHandler<&'d dyn Directory> for Resolution<'_> {
    fn attempt(&mut self, dir: &&'d dyn Directory, budget: &RetryBudget) -> Step {
        match dir.find_user(self.username) {
            Ok(entries) => {
                if entries.is_empty() {
                    debug!(target: "strongbox::resolve", "resolve.no_match directory={} user={}", dir.id(), self.username);
                } else {
                    debug!(target: "strongbox::resolve", "resolve.found directory={} user={} entries={}", dir.id(), self.username, entries.len());
                }
                for e in entries { self.add(e); }
                Step::Complete
            }
            Err(err) => {
                let action = self.table.classify(Backend::Directory, err.signal());
                match action {
                    Action::Retry => {
                        debug!(target: "strongbox::resolve", "resolve.retryable directory={} user={} round={} err={}", dir.id(), self.username, budget.round(), err);
                    }
                    Action::DropSilent => {
                        debug!(target: "strongbox::resolve", "resolve.drop directory={} user={} err={}", dir.id(), self.username, err);
                    }
                    _ => {
                        info!(target: "strongbox::resolve", "resolve.drop directory={} user={} round={} err={}", dir.id(), self.username, budget.round(), err);
                        self.ledger.record(dir.id(), &err);
                    }
                }
                Step::Act(action)
            }
        }
    }

    fn exhausted(&mut self, dir: &&'d dyn Directory, budget: &RetryBudget) {
        info!(
            target: "strongbox::resolve",
            "resolve.retries_exhausted directory={} user={} attempts={}; skipping for this call",
            dir.id(), self.username, budget.max_retries() + 1
        );
    }
}

impl DirectoryResolver {
    pub fn new(table: ClassificationTable) -> Self { Self { table } }

    /// Query every directory (sharing one retry budget), merge and de-duplicate the
    /// results, apply the optional org constraint, and require at most one survivor.
    ///
    /// Entries without an org mapping only survive when no constraint is given.
    pub fn resolve(
        &self,
        username: &str,
        directories: &[&dyn Directory],
        org_constraint: Option<&str>,
        max_retries: u32,
    ) -> Result<Option<DirectoryEntry>, ResolveError> {
        let mut set = WorkingSet::new(directories.iter().copied());
        let mut res = Resolution {
            username,
            table: &self.table,
            seen: HashSet::new(),
            candidates: Vec::new(),
            ledger: ErrorLedger::new(),
        };
        let outcome = run_rounds(&mut set, max_retries, &mut res);
        if let RoundOutcome::Terminal { action, round } = outcome {
            // Only reachable with a custom table; keep whatever was collected.
            info!(target: "strongbox::resolve", "resolve.terminal user={} action={:?} round={}", username, action, round);
        }
        let collected = res.candidates.len();
        let mut matches: Vec<DirectoryEntry> = res
            .candidates
            .into_iter()
            .filter(|e| match org_constraint {
                Some(org) => e.org_mapping() == Some(org),
                None => true,
            })
            .collect();
        debug!(
            target: "strongbox::resolve",
            "resolve.done user={} org={:?} outcome={:?} collected={} matched={}",
            username, org_constraint, outcome, collected, matches.len()
        );
        if !res.ledger.is_empty() {
            if matches.is_empty() {
                info!(target: "strongbox::resolve", "resolve.failed user={} errors={} [{}]", username, res.ledger.len(), res.ledger.summary());
            } else {
                debug!(target: "strongbox::resolve", "resolve.errors user={} count={} [{}]", username, res.ledger.len(), res.ledger.summary());
            }
        }
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(ResolveError::NonUnique { username: username.to_string(), matches: n }),
        }
    }
}
