//! Debugger settings shared by the process list

/// Process-wide debugger options
#[derive(Debug, Clone, Default)]
pub struct DebuggerSettings {
    /// Show ids and numbers in hex
    pub use_hexadecimal: bool,
}

impl DebuggerSettings {
    pub fn new() -> Self {
        Self::default()
    }
}
