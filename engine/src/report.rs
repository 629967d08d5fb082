//! Event reporting trait.
//!
//! Pipeline stages never log through a global. They receive a `&dyn Reporter`
//! and describe what happened as an `Event`. `TracingReporter` forwards events
//! to `tracing`; `NullReporter` drops them.

use std::fmt;

/// Severity of a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
}

/// A single thing worth telling the operator about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub severity: Severity,
    /// Pipeline stage that produced the event (`lister`, `reconciler`, ...)
    pub component: &'static str,
    /// Operation within that stage (`list_dir`, `net_list`, ...)
    pub operation: &'static str,
    pub message: String,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.component, self.operation, self.message)
    }
}

/// Receiver for pipeline events.
///
/// All methods are called synchronously from the stage that produced the event.
pub trait Reporter {
    fn emit(&self, event: &Event);

    fn debug(&self, component: &'static str, operation: &'static str, message: String) {
        self.emit(&Event { severity: Severity::Debug, component, operation, message });
    }

    fn info(&self, component: &'static str, operation: &'static str, message: String) {
        self.emit(&Event { severity: Severity::Info, component, operation, message });
    }

    fn warn(&self, component: &'static str, operation: &'static str, message: String) {
        self.emit(&Event { severity: Severity::Warn, component, operation, message });
    }
}

/// Forwards events to the installed `tracing` subscriber.
///
/// Every event has target `engine`; the originating stage is carried in the
/// `component` and `operation` fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn emit(&self, event: &Event) {
        let Event { component, operation, message, .. } = event;
        match event.severity {
            Severity::Debug => tracing::debug!(target: "engine", component, operation, "{}", message),
            Severity::Info => tracing::info!(target: "engine", component, operation, "{}", message),
            Severity::Warn => tracing::warn!(target: "engine", component, operation, "{}", message),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn emit(&self, _event: &Event) {}
}
