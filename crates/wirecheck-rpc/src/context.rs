use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Ambient per-call state owned by the runtime.
///
/// Middleware reads it and forwards it unchanged to the next stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    metadata: BTreeMap<String, String>,
    deadline: Option<Instant>,
}

impl Context {
    /// An empty context with no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the deadline to `timeout` from now.
    ///
    /// A timeout too large to represent, such as [`Duration::MAX`], clears
    /// the deadline instead.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true if a deadline is set and has passed.
    pub fn is_expired(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }
}
