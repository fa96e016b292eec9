//! Command processing
//!
//! Command definitions for the process list REPL.

use crate::debug::types::ProcessId;

/// Process list commands that can be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Show the process list
    List,
    /// Replace the selection with these process ids
    Select(Vec<ProcessId>),
    /// Clear the selection
    ClearSelection,
    SelectAll,
    Copy,
    Continue,
    Break,
    StepInto,
    StepOver,
    StepOut,
    Detach,
    Terminate,
    Attach,
    /// Toggle detach-when-debugging-stopped on the selection
    ToggleDetachOnStop,
    ToggleHex,
    /// Make the selected process current
    SetCurrent,
    /// Show help
    Help,
    /// Quit application
    Quit,
    /// Unknown command
    Unknown(String),
}

/// Parse a command string into AppCommand
pub fn parse_command(input: &str) -> AppCommand {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts.first().unwrap_or(&"");
    let arg = parts.get(1).map(|s| s.trim());

    match *cmd {
        "ps" | "list" | "ls" => AppCommand::List,
        "sel" | "select" => {
            if let Some(ids) = arg {
                match parse_ids(ids) {
                    Some(ids) if !ids.is_empty() => AppCommand::Select(ids),
                    _ => AppCommand::Unknown("Invalid process id".into()),
                }
            } else {
                AppCommand::Unknown("sel requires one or more process ids".into())
            }
        }
        "sel-" | "unselect" => AppCommand::ClearSelection,
        "selall" | "sa" => AppCommand::SelectAll,
        "copy" | "y" => AppCommand::Copy,
        "c" | "continue" | "dc" => AppCommand::Continue,
        "b" | "break" => AppCommand::Break,
        "si" | "step" | "ds" => AppCommand::StepInto,
        "so" | "next" | "dso" => AppCommand::StepOver,
        "sout" | "finish" => AppCommand::StepOut,
        "detach" => AppCommand::Detach,
        "kill" | "terminate" => AppCommand::Terminate,
        "attach" => AppCommand::Attach,
        "dos" | "detach-on-stop" => AppCommand::ToggleDetachOnStop,
        "hex" => AppCommand::ToggleHex,
        "cur" | "current" => AppCommand::SetCurrent,
        "help" | "?" => AppCommand::Help,
        "quit" | "exit" | "q" => AppCommand::Quit,
        _ => AppCommand::Unknown(input.to_string()),
    }
}

/// Parse whitespace or comma separated process ids (decimal or 0x hex)
fn parse_ids(s: &str) -> Option<Vec<ProcessId>> {
    s.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(parse_id)
        .collect()
}

fn parse_id(s: &str) -> Option<ProcessId> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        ProcessId::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}
