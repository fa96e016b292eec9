//! Text columns for process list rows.

use std::fmt::Write;

use crate::app::ProcessVm;
use crate::debug::types::ProcessId;

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Marker written in the image column for the current process
pub const CURRENT_PROCESS_MARKER: &str = ">";

/// Writes the columns of a process row
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessFormatter {
    pub use_hexadecimal: bool,
    /// Id of the debugger's current process
    pub current: Option<ProcessId>,
}

impl ProcessFormatter {
    pub fn new(use_hexadecimal: bool, current: Option<ProcessId>) -> Self {
        Self {
            use_hexadecimal,
            current,
        }
    }

    pub fn write_image(&self, out: &mut String, vm: &ProcessVm) {
        if self.current == Some(vm.process.id()) {
            out.push_str(CURRENT_PROCESS_MARKER);
        }
    }

    pub fn write_name(&self, out: &mut String, vm: &ProcessVm) {
        out.push_str(&vm.process.name());
    }

    pub fn write_id(&self, out: &mut String, vm: &ProcessVm) {
        let id = vm.process.id();
        // Writing to a String never fails
        let _ = if self.use_hexadecimal {
            write!(out, "0x{:08X}", id)
        } else {
            write!(out, "{}", id)
        };
    }

    pub fn write_title(&self, out: &mut String, vm: &ProcessVm) {
        out.push_str(&vm.title);
    }

    pub fn write_state(&self, out: &mut String, vm: &ProcessVm) {
        out.push_str(vm.process.state().as_str());
    }

    pub fn write_debugging(&self, out: &mut String, vm: &ProcessVm) {
        out.push_str(&vm.process.debugging());
    }

    pub fn write_path(&self, out: &mut String, vm: &ProcessVm) {
        out.push_str(&vm.process.filename());
    }

    /// Write one tab-separated row followed by a line terminator
    pub fn write_row(&self, out: &mut String, vm: &ProcessVm) {
        self.write_image(out, vm);
        out.push('\t');
        self.write_name(out, vm);
        out.push('\t');
        self.write_id(out, vm);
        out.push('\t');
        self.write_title(out, vm);
        out.push('\t');
        self.write_state(out, vm);
        out.push('\t');
        self.write_debugging(out, vm);
        out.push('\t');
        self.write_path(out, vm);
        out.push_str(LINE_ENDING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::sim::SimManager;
    use crate::debug::types::ProcessState;

    fn entry() -> ProcessVm {
        let manager = SimManager::new();
        let process = manager.spawn("app.exe", "C:\\app.exe", ProcessState::Running);
        ProcessVm::new(0, process).with_title("Main Window")
    }

    #[test]
    fn test_row_columns() {
        let vm = entry();
        let mut out = String::new();
        ProcessFormatter::new(false, None).write_row(&mut out, &vm);

        let expected = format!("\tapp.exe\t1000\tMain Window\tRunning\tNative\tC:\\app.exe{}", LINE_ENDING);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_hex_id_and_current_marker() {
        let vm = entry();
        let formatter = ProcessFormatter::new(true, Some(1000));

        let mut id = String::new();
        formatter.write_id(&mut id, &vm);
        assert_eq!(id, "0x000003E8");

        let mut image = String::new();
        formatter.write_image(&mut image, &vm);
        assert_eq!(image, CURRENT_PROCESS_MARKER);
    }
}
