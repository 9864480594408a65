//! Runner file commands (`GITHUB_ENV`, `GITHUB_OUTPUT`).

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{command_value, escape_data, escape_property, WorkflowSink};
use crate::error::{LabelsError, Result};

/// Writes exports and outputs to the runner's command files.
///
/// When a file path is not configured (older runners, local runs), the legacy
/// `::set-env` / `::set-output` stdout commands are written instead.
pub struct FileCommandSink<W = io::Stdout> {
    env_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    stdout: W,
}

impl FileCommandSink<io::Stdout> {
    #[must_use]
    pub fn new(env_file: Option<PathBuf>, output_file: Option<PathBuf>) -> Self {
        Self::with_writer(env_file, output_file, io::stdout())
    }
}

impl<W: Write> FileCommandSink<W> {
    pub fn with_writer(env_file: Option<PathBuf>, output_file: Option<PathBuf>, stdout: W) -> Self {
        Self {
            env_file,
            output_file,
            stdout,
        }
    }

    pub fn into_writer(self) -> W {
        self.stdout
    }

    fn issue_command(&mut self, command: &str, name: &str, value: &str) -> Result<()> {
        writeln!(
            self.stdout,
            "::{command} name={}::{}",
            escape_property(name),
            escape_data(value)
        )?;
        Ok(())
    }
}

impl<W: Write> WorkflowSink for FileCommandSink<W> {
    fn export_variable(&mut self, name: &str, value: &str) -> Result<()> {
        match &self.env_file {
            Some(path) => append_key_value(path, name, value),
            None => self.issue_command("set-env", name, value),
        }
    }

    fn set_output(&mut self, name: &str, value: &Value) -> Result<()> {
        let rendered = command_value(value);
        match &self.output_file {
            Some(path) => append_key_value(path, name, &rendered),
            None => {
                writeln!(self.stdout)?;
                self.issue_command("set-output", name, &rendered)
            }
        }
    }
}

/// Append `name<<delimiter` heredoc syntax so values may span lines.
fn append_key_value(path: &Path, name: &str, value: &str) -> Result<()> {
    let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
    append_delimited(path, name, value, &delimiter)
}

fn append_delimited(path: &Path, name: &str, value: &str, delimiter: &str) -> Result<()> {
    for (kind, text) in [("name", name), ("value", value)] {
        if text.contains(delimiter) {
            return Err(LabelsError::DelimiterCollision {
                kind,
                delimiter: delimiter.to_string(),
            });
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    write!(file, "{name}<<{delimiter}\n{value}\n{delimiter}\n")?;
    debug!("Wrote {} to {}", name, path.display());
    Ok(())
}
