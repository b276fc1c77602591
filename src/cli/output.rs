use crate::core::command::Command;
use crate::core::stream::Sink;
use crate::domain::config::{CmdTreeConfig, OutputFormat};
use serde::Serialize;
use std::io::{self, Write};
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_commands(&self, commands: &[CommandSummary]) -> Result<(), OutputError>;
    fn write_config(&self, config: &CmdTreeConfig) -> Result<(), OutputError>;
    fn write_message(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("TOML serialization error: {0}")]
    TomlError(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::CmdTreeError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// One row of a command tree listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct CommandSummary {
    /// Names from the root, space separated
    pub path: String,
    pub name: String,
    pub depth: usize,
    #[tabled(rename = "runnable")]
    pub has_handler: bool,
    pub children: usize,
}

/// Flatten the tree under `root` in depth-first order, children by name.
///
/// A child that is already an ancestor on the current path is listed but
/// not descended into.
pub fn summarize<E>(root: &Command<E>) -> Vec<CommandSummary> {
    let mut rows = Vec::new();
    let mut ancestors = Vec::new();
    collect(root, root.name().to_string(), 0, &mut ancestors, &mut rows);
    rows
}

fn collect<E>(
    cmd: &Command<E>,
    path: String,
    depth: usize,
    ancestors: &mut Vec<Command<E>>,
    rows: &mut Vec<CommandSummary>,
) {
    let children = cmd.children();
    rows.push(CommandSummary {
        path: path.clone(),
        name: cmd.name().to_string(),
        depth,
        has_handler: cmd.has_handler(),
        children: children.len(),
    });

    if ancestors.iter().any(|a| a.same_node(cmd)) {
        return;
    }

    ancestors.push(cmd.clone());
    for child in &children {
        let child_path = format!("{} {}", path, child.name());
        collect(child, child_path, depth + 1, ancestors, rows);
    }
    ancestors.pop();
}

/// Writer over the sinks a command resolves
pub struct SinkWriter {
    format: OutputFormat,
    out: Sink,
    err: Sink,
}

impl SinkWriter {
    pub fn new(format: OutputFormat, out: Sink, err: Sink) -> Self {
        Self { format, out, err }
    }

    /// Writer bound to the effective output and error sinks of `cmd`
    pub fn for_command<E>(cmd: &Command<E>, format: OutputFormat) -> Self {
        Self::new(format, cmd.output_stream(), cmd.error_stream())
    }

    fn emit(&self, sink: &Sink, content: &str) -> Result<(), OutputError> {
        let mut writer = sink.borrow_mut();
        writer.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl OutputWriter for SinkWriter {
    fn write_commands(&self, commands: &[CommandSummary]) -> Result<(), OutputError> {
        let content = match self.format {
            OutputFormat::Text => {
                let mut text = String::new();
                for command in commands {
                    let marker = if command.has_handler { "" } else { " (group)" };
                    text.push_str(&format!("{}{}{}\n", "  ".repeat(command.depth), command.name, marker));
                }
                text
            }
            OutputFormat::Json => serde_json::to_string_pretty(commands)?,
            OutputFormat::Table => Table::new(commands.to_vec()).to_string(),
        };
        self.emit(&self.out, &content)
    }

    fn write_config(&self, config: &CmdTreeConfig) -> Result<(), OutputError> {
        let content = match self.format {
            OutputFormat::Text => toml::to_string_pretty(config)?,
            OutputFormat::Json => serde_json::to_string_pretty(config)?,
            OutputFormat::Table => {
                let rows = vec![
                    ConfigTableRow::new("global.log_level", &config.global.log_level),
                    ConfigTableRow::new("global.output_format", &config.global.output_format.to_string()),
                    ConfigTableRow::new("global.log_location", &config.global.log_location.to_string()),
                ];
                Table::new(rows).to_string()
            }
        };
        self.emit(&self.out, &content)
    }

    fn write_message(&self, message: &str) -> Result<(), OutputError> {
        self.emit(&self.out, message)
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        self.emit(&self.err, error)
    }
}

#[derive(Tabled)]
struct ConfigTableRow {
    key: String,
    value: String,
}

impl ConfigTableRow {
    fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
