//! Scripted directory/authenticator doubles shared by the integration tests.
//! Each double replays its script one step per call; the last step repeats.
#![allow(dead_code)]

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::Level;
use strongbox::error::{AuthError, DirectoryError};
use strongbox::identity::{AuthOutcome, Authenticator, Directory, DirectoryEntry};

/// Ordered record of every backend call made during a test, across all doubles.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog { Arc::new(Mutex::new(Vec::new())) }

pub struct ScriptedDirectory {
    id: String,
    script: Vec<Result<Vec<DirectoryEntry>, DirectoryError>>,
    calls: Mutex<usize>,
    log: CallLog,
}

impl ScriptedDirectory {
    pub fn new(id: &str, script: Vec<Result<Vec<DirectoryEntry>, DirectoryError>>, log: &CallLog) -> Self {
        assert!(!script.is_empty(), "script must have at least one step");
        Self { id: id.to_string(), script, calls: Mutex::new(0), log: log.clone() }
    }

    pub fn always(id: &str, step: Result<Vec<DirectoryEntry>, DirectoryError>, log: &CallLog) -> Self {
        Self::new(id, vec![step], log)
    }

    pub fn timing_out(id: &str, log: &CallLog) -> Self {
        Self::always(id, Err(DirectoryError::Timeout(format!("{} read timed out", id))), log)
    }

    pub fn returning(id: &str, entries: Vec<DirectoryEntry>, log: &CallLog) -> Self {
        Self::always(id, Ok(entries), log)
    }

    pub fn calls(&self) -> usize { *self.calls.lock() }
}

impl Directory for ScriptedDirectory {
    fn id(&self) -> &str { &self.id }

    fn find_user(&self, _username: &str) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        let mut calls = self.calls.lock();
        let step = self.script[(*calls).min(self.script.len() - 1)].clone();
        *calls += 1;
        self.log.lock().push(self.id.clone());
        step
    }
}

pub struct ScriptedAuthenticator {
    id: String,
    script: Vec<Result<AuthOutcome, AuthError>>,
    calls: Mutex<usize>,
    log: CallLog,
}

impl ScriptedAuthenticator {
    pub fn new(id: &str, script: Vec<Result<AuthOutcome, AuthError>>, log: &CallLog) -> Self {
        assert!(!script.is_empty(), "script must have at least one step");
        Self { id: id.to_string(), script, calls: Mutex::new(0), log: log.clone() }
    }

    pub fn always(id: &str, step: Result<AuthOutcome, AuthError>, log: &CallLog) -> Self {
        Self::new(id, vec![step], log)
    }

    pub fn calls(&self) -> usize { *self.calls.lock() }
}

impl Authenticator for ScriptedAuthenticator {
    fn id(&self) -> &str { &self.id }

    fn authenticate(&self, _entry: &DirectoryEntry, _password: &str) -> Result<AuthOutcome, AuthError> {
        let mut calls = self.calls.lock();
        let step = self.script[(*calls).min(self.script.len() - 1)].clone();
        *calls += 1;
        self.log.lock().push(self.id.clone());
        step
    }
}

pub fn entry(directory: &str, identity: &str) -> DirectoryEntry { DirectoryEntry::new(directory, identity) }

pub fn entry_in_org(directory: &str, identity: &str, org: &str) -> DirectoryEntry {
    DirectoryEntry::new(directory, identity).with_org(org)
}

/// Shared buffer a fmt subscriber writes into.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

/// Run `f` with a thread-local subscriber at `level` and return everything it logged.
pub fn capture_logs<R>(level: Level, f: impl FnOnce() -> R) -> (R, String) {
    let buf = LogBuffer::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&buf.0.lock()).into_owned();
    (out, text)
}
