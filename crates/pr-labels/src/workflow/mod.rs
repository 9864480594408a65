//! GitHub Actions host primitives.
//!
//! Outputs and exported variables go through the [`WorkflowSink`] trait so the
//! action logic never touches the process environment directly. Log lines are
//! ordinary `tracing` events rendered as workflow commands by
//! [`logging::WorkflowCommandFormat`].

pub mod files;
pub mod logging;

pub use files::FileCommandSink;
pub use logging::WorkflowCommandFormat;

use serde_json::Value;

use crate::error::Result;

/// Destination for step outputs and exported environment variables.
pub trait WorkflowSink {
    /// Make `name=value` visible to the remaining steps of the job.
    fn export_variable(&mut self, name: &str, value: &str) -> Result<()>;

    /// Set a step output. Strings are written verbatim, other values as JSON.
    fn set_output(&mut self, name: &str, value: &Value) -> Result<()>;
}

/// Render an output value the way the runner expects it.
#[must_use]
pub fn command_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Escape a workflow command message.
#[must_use]
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property value.
#[must_use]
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
