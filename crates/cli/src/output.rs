use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Ok,
    Error,
}

/// Result of one subcommand: rendered as text lines, or as the JSON envelope
/// `{status, message, data}` under `--json`.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub status: CommandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
    /// Human-readable body printed in text mode
    #[serde(skip)]
    pub lines: Vec<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>, data: impl Serialize) -> Result<Self> {
        Ok(Self {
            status: CommandStatus::Ok,
            message: Some(message.into()),
            data: serde_json::to_value(data)?,
            lines: Vec::new(),
        })
    }

    /// A failure that still carries structured detail (e.g. invalid lines)
    pub fn rejected(message: impl Into<String>, data: impl Serialize) -> Result<Self> {
        Ok(Self {
            status: CommandStatus::Error,
            ..Self::ok(message, data)?
        })
    }

    pub fn error(err: &anyhow::Error) -> Self {
        Self {
            status: CommandStatus::Error,
            message: Some(format!("{err:#}")),
            data: Value::Null,
            lines: Vec::new(),
        }
    }

    pub fn with_lines(mut self, lines: impl IntoIterator<Item = String>) -> Self {
        self.lines = lines.into_iter().collect();
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, CommandStatus::Error)
    }

    /// Print to stdout. Text mode prints the body lines, or the message when
    /// there are none; errors go to stderr.
    pub fn emit(&self, json: bool) -> Result<()> {
        if json {
            return print_stdout(&serde_json::to_string_pretty(self)?);
        }

        let message = self.message.as_deref().unwrap_or_default();
        if self.is_error() {
            eprintln!("Error: {message}");
            for line in &self.lines {
                eprintln!("  {line}");
            }
            return Ok(());
        }
        if self.lines.is_empty() {
            print_stdout(message)
        } else {
            print_stdout(&self.lines.join("\n"))
        }
    }
}

/// Write one block to stdout; a closed pipe (`| head`) is not an error.
fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}
