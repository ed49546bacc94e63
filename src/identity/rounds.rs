//! Working-set and shared retry-budget bookkeeping used by both the resolver and
//! the authentication orchestrator.
//!
//! A call owns one `WorkingSet`, one `RetryBudget` and one `ErrorLedger`; all three
//! are dropped when the call returns. Candidates are tagged with an explicit state
//! instead of being removed from the collection, so a round can iterate over a
//! stable snapshot of indices while states change underneath it.

use std::fmt::Display;

use super::classifier::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateState {
    Active,
    Retrying,
    Removed,
    Done,
}

impl CandidateState {
    pub fn is_live(self) -> bool { matches!(self, CandidateState::Active | CandidateState::Retrying) }
}

#[derive(Debug, Clone)]
struct Candidate<T> {
    item: T,
    state: CandidateState,
    attempts: u32,
}

#[derive(Debug, Clone)]
pub struct WorkingSet<T> {
    candidates: Vec<Candidate<T>>,
}

impl<T> WorkingSet<T> {
    pub fn new<I: IntoIterator<Item = T>>(items: I) -> Self {
        let candidates = items
            .into_iter()
            .map(|item| Candidate { item, state: CandidateState::Active, attempts: 0 })
            .collect();
        Self { candidates }
    }

    /// True once no candidate is Active or Retrying.
    pub fn is_empty(&self) -> bool { !self.candidates.iter().any(|c| c.state.is_live()) }

    /// Retrying candidates become eligible again at the start of a round.
    pub fn begin_round(&mut self) {
        for c in self.candidates.iter_mut() {
            if c.state == CandidateState::Retrying { c.state = CandidateState::Active; }
        }
    }

    /// Indices of the candidates eligible for this round, in list order.
    pub fn snapshot(&self) -> Vec<usize> {
        self.candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| c.state == CandidateState::Active)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn item(&self, idx: usize) -> &T { &self.candidates[idx].item }

    pub fn state(&self, idx: usize) -> CandidateState { self.candidates[idx].state }

    pub fn attempts(&self, idx: usize) -> u32 { self.candidates[idx].attempts }

    fn record_attempt(&mut self, idx: usize) { self.candidates[idx].attempts += 1; }

    fn transition(&mut self, idx: usize, to: CandidateState) {
        let c = &mut self.candidates[idx];
        // Removed and Done are final.
        if c.state.is_live() { c.state = to; }
    }

    pub fn complete(&mut self, idx: usize) { self.transition(idx, CandidateState::Done); }
    pub fn retry(&mut self, idx: usize) { self.transition(idx, CandidateState::Retrying); }
    pub fn remove(&mut self, idx: usize) { self.transition(idx, CandidateState::Removed); }
}

/// One budget per call, consumed once per round rather than once per candidate.
/// Rounds are numbered from 1; a retryable failure keeps its candidate only while
/// `round <= max_retries`, so no candidate is attempted more than `max_retries + 1` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    max_retries: u32,
    round: u32,
}

impl RetryBudget {
    pub fn new(max_retries: u32) -> Self { Self { max_retries, round: 1 } }

    pub fn max_retries(&self) -> u32 { self.max_retries }

    pub fn round(&self) -> u32 { self.round }

    pub fn allows_retry(&self) -> bool { self.round <= self.max_retries }

    pub fn advance(&mut self) { self.round += 1; }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub source: String,
    pub message: String,
}

/// Diagnostics-only record of the unexpected errors seen during one call.
#[derive(Debug, Clone, Default)]
pub struct ErrorLedger {
    entries: Vec<LedgerEntry>,
}

impl ErrorLedger {
    pub fn new() -> Self { Self::default() }

    pub fn record(&mut self, source: &str, err: impl Display) {
        self.entries.push(LedgerEntry { source: source.to_string(), message: err.to_string() });
    }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn len(&self) -> usize { self.entries.len() }

    /// Compact single-line form for log output.
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.source, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Result of a single attempt as seen by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Candidate finished successfully and leaves the set.
    Complete,
    /// Candidate failed; apply the classified action.
    Act(Action),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The working set drained without a terminal classification.
    Drained { rounds: u32 },
    /// A terminal action ended the call during `round`.
    Terminal { action: Action, round: u32 },
}

pub trait RoundHandler<T> {
    fn attempt(&mut self, item: &T, budget: &RetryBudget) -> Step;

    /// Called when a retryable failure arrives after the budget is spent.
    fn exhausted(&mut self, _item: &T, _budget: &RetryBudget) {}
}

/// Run sequential rounds over `set` until it drains or a terminal action fires.
/// Candidates are attempted strictly in list order within a round.
pub fn run_rounds<T, H: RoundHandler<T>>(set: &mut WorkingSet<T>, max_retries: u32, handler: &mut H) -> RoundOutcome {
    let mut budget = RetryBudget::new(max_retries);
    while !set.is_empty() {
        set.begin_round();
        for idx in set.snapshot() {
            set.record_attempt(idx);
            match handler.attempt(set.item(idx), &budget) {
                Step::Complete => set.complete(idx),
                Step::Act(action) if action.is_terminal() => {
                    return RoundOutcome::Terminal { action, round: budget.round() };
                }
                Step::Act(Action::Retry) => {
                    if budget.allows_retry() {
                        set.retry(idx);
                    } else {
                        handler.exhausted(set.item(idx), &budget);
                        set.remove(idx);
                    }
                }
                Step::Act(_) => set.remove(idx),
            }
        }
        budget.advance();
    }
    RoundOutcome::Drained { rounds: budget.round() - 1 }
}

#[cfg(test)]
#[path = "rounds_tests.rs"]
mod rounds_tests;
