use std::fmt;
use uuid::Uuid;

/// Per-login correlation id attached to every log event of that login.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new() -> Self { Self(Uuid::new_v4().to_string()) }

    /// Reuse an upstream id when one is supplied and non-blank.
    pub fn from_opt_str(s: Option<&str>) -> Self {
        match s {
            Some(v) if !v.trim().is_empty() => Self(v.trim().to_string()),
            _ => Self::new(),
        }
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for CorrelationId {
    fn default() -> Self { Self::new() }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}
