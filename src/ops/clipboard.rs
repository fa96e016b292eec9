//! Clipboard access for the Copy command.

use std::io::{self, IsTerminal, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

/// Clipboard errors
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard write failed: {0}")]
    Io(#[from] io::Error),
}

/// Destination for copied text
#[cfg_attr(test, mockall::automock)]
pub trait Clipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Sets the terminal emulator's clipboard with an OSC 52 sequence
#[derive(Debug, Default)]
pub struct TerminalClipboard;

impl TerminalClipboard {
    pub fn new() -> Self {
        Self
    }

    fn osc52(text: &str) -> String {
        format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
    }
}

impl Clipboard for TerminalClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut stdout = io::stdout().lock();
        if !stdout.is_terminal() {
            return Err(ClipboardError::Unavailable("stdout is not a terminal".into()));
        }
        stdout.write_all(Self::osc52(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}
