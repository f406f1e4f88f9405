//! Build console output.
//!
//! The build console is what a user reads on the run page. It is separate from
//! the `tracing` system log, which targets operators.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

/// Append-only sink for console lines of one build.
pub trait BuildLog: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Writes console lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutBuildLog;

impl BuildLog for StdoutBuildLog {
    fn write_line(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout must not take the build down.
        let _ = writeln!(out, "{line}");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBuildLog;

impl BuildLog for NullBuildLog {
    fn write_line(&self, _line: &str) {}
}

/// Console logger that prefixes every line with `[{label}] `.
#[derive(Clone)]
pub struct PluginLogger {
    log: Arc<dyn BuildLog>,
    label: String,
}

impl PluginLogger {
    pub fn new(log: Arc<dyn BuildLog>, label: impl Into<String>) -> Self {
        Self {
            log,
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Log a message; embedded newlines produce one prefixed line each.
    pub fn log(&self, message: impl fmt::Display) {
        for line in message.to_string().lines() {
            self.log.write_line(&format!("[{}] {}", self.label, line));
        }
    }

    pub fn log_each_line<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.log(line.as_ref());
        }
    }
}

impl fmt::Debug for PluginLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginLogger")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
