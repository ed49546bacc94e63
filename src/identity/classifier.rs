//! Data-driven mapping from a backend signal to what the round driver does with
//! the candidate that produced it. Adding a new error kind means adding a row.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Directory,
    Authenticator,
}

/// What a backend call reported, stripped of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Success,
    Timeout,
    Communication,
    PasswordAuthFailed,
    UserNotFound,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Keep the candidate for the next round while budget remains.
    Retry,
    /// Remove the candidate; expected outcome, nothing to record.
    DropSilent,
    /// Remove the candidate and record the error in the ledger.
    DropNoteworthy,
    /// End the whole operation with a positive result.
    TerminalTrue,
    /// End the whole operation with a negative result.
    TerminalFalse,
}

impl Action {
    pub fn is_terminal(self) -> bool { matches!(self, Action::TerminalTrue | Action::TerminalFalse) }
}

const STANDARD_RULES: &[(Backend, Signal, Action)] = &[
    (Backend::Directory, Signal::Timeout, Action::Retry),
    (Backend::Directory, Signal::Communication, Action::DropNoteworthy),
    (Backend::Directory, Signal::Generic, Action::DropNoteworthy),
    (Backend::Authenticator, Signal::Success, Action::TerminalTrue),
    (Backend::Authenticator, Signal::Timeout, Action::Retry),
    (Backend::Authenticator, Signal::Communication, Action::Retry),
    (Backend::Authenticator, Signal::PasswordAuthFailed, Action::TerminalFalse),
    (Backend::Authenticator, Signal::UserNotFound, Action::DropSilent),
    (Backend::Authenticator, Signal::Generic, Action::DropNoteworthy),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTable {
    rules: HashMap<(Backend, Signal), Action>,
}

impl ClassificationTable {
    pub fn from_rules(rules: &[(Backend, Signal, Action)]) -> Self {
        let rules = rules.iter().map(|&(b, s, a)| ((b, s), a)).collect();
        Self { rules }
    }

    pub fn standard() -> Self { Self::from_rules(STANDARD_RULES) }

    /// Replace (or add) a single row.
    pub fn with_rule(mut self, backend: Backend, signal: Signal, action: Action) -> Self {
        self.rules.insert((backend, signal), action);
        self
    }

    /// Unknown combinations are treated as unexpected errors.
    pub fn classify(&self, backend: Backend, signal: Signal) -> Action {
        self.rules.get(&(backend, signal)).copied().unwrap_or(Action::DropNoteworthy)
    }
}

impl Default for ClassificationTable {
    fn default() -> Self { Self::standard() }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod classifier_tests;
