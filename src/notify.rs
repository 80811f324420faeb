//! Progress notices emitted during a lookup.

use std::sync::Mutex;

/// Receives human-readable progress notices.
///
/// Notices are advisory: they never influence the outcome of a lookup and
/// implementations must not fail.
pub trait Notifier: Send + Sync {
    /// Emits one notice.
    fn notice(&self, message: &str);
}

/// Forwards notices to `tracing` at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notice(&self, message: &str) {
        tracing::info!(target: "tpmstore::notice", "{}", message);
    }
}

/// Discards every notice.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notice(&self, _message: &str) {}
}

/// Keeps notices in memory.
///
/// Useful for asserting on what a lookup reported.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded notices in emission order.
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notice(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
