//! Porting diagnostics.
//!
//! The original 626 migration aid printed a warning line whenever an app
//! called something the 826 cannot express. That channel survives here as
//! the [`Reporter`] trait: a synchronous, infallible, never-blocking sink
//! for human-readable porting notes. Diagnostics are advisory only -- the
//! operation's result always travels through its return value, whether or
//! not a note was also emitted.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

/// Sink for porting diagnostics.
///
/// Implementations must not block and must not fail; a diagnostic never
/// gates the completion of the operation that raised it.
pub trait Reporter: Send + Sync {
    /// Surface one human-readable porting note.
    fn notify(&self, message: &str);
}

/// Default reporter: one `tracing` warning per diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn notify(&self, message: &str) {
        warn!(target: "s626_compat", "{message}");
    }
}

/// Reporter that collects diagnostics in memory.
///
/// Intended for test suites of ported applications: clone one into the
/// session, run the code under test, then assert on [`messages`].
///
/// [`messages`]: MemoryReporter::messages
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics collected so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of diagnostics collected so far.
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// True if no diagnostic has been collected.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Discard all collected diagnostics.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Reporter for MemoryReporter {
    fn notify(&self, message: &str) {
        self.lines.lock().push(message.to_owned());
    }
}
