//! CLI - reedline-based REPL over the process list
//!
//! Drives the process list commands against a simulated debugger session.
//! Every command checks its guard before running.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use colored::Colorize;
use reedline::{Prompt, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal};

use crate::app::{parse_command, AppCommand, DebuggerSettings, ProcessesVm};
use crate::debug::sim::{SimAttachDialog, SimManager};
use crate::debug::types::ProcessId;
use crate::debug::{AttachDialog, DbgManager};
use crate::ops::clipboard::TerminalClipboard;
use crate::ops::format::ProcessFormatter;
use crate::ops::{ProcessesOperations, ProcessesOperationsImpl};

/// Prompt showing the selection size and the current process
pub struct ProcessPrompt {
    selected: usize,
    current: Option<ProcessId>,
}

impl ProcessPrompt {
    pub fn new() -> Self {
        Self {
            selected: 0,
            current: None,
        }
    }

    pub fn update(&mut self, selected: usize, current: Option<ProcessId>) {
        self.selected = selected;
        self.current = current;
    }
}

impl Default for ProcessPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for ProcessPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        let current = match self.current {
            Some(pid) => pid.to_string(),
            None => "-".to_string(),
        };
        Cow::Owned(format!("[sel:{} cur:{}]", self.selected, current))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "(failed) ",
        };
        Cow::Owned(format!("(search: {}{}) ", prefix, history_search.term))
    }
}

/// REPL state: the simulated session and the list commands over it
pub struct CliSession {
    manager: SimManager,
    processes_vm: Rc<RefCell<ProcessesVm>>,
    ops: ProcessesOperationsImpl,
}

impl CliSession {
    pub fn new(manager: SimManager, settings: DebuggerSettings) -> Self {
        let processes_vm = Rc::new(RefCell::new(ProcessesVm::new()));
        let dbg_manager = manager.clone();
        let dialog_manager = manager.clone();

        let ops = ProcessesOperationsImpl::new(
            processes_vm.clone(),
            Rc::new(RefCell::new(settings)),
            Box::new(move || Rc::new(dbg_manager) as Rc<dyn DbgManager>),
            Box::new(move || Rc::new(SimAttachDialog::new(dialog_manager)) as Rc<dyn AttachDialog>),
            Box::new(TerminalClipboard::new()),
        );

        let session = Self {
            manager,
            processes_vm,
            ops,
        };
        session.sync();
        session
    }

    /// Pick up processes added or removed by the session
    fn sync(&self) {
        let processes = self.manager.processes();
        self.processes_vm.borrow_mut().sync(&processes);
    }

    fn print_list(&self) {
        let list = self.processes_vm.borrow();
        if list.all_items.is_empty() {
            println!("    {}", "(no processes)".dimmed());
            return;
        }

        let formatter = ProcessFormatter::new(self.ops.use_hexadecimal(), self.manager.current_id());
        println!(
            "  {:<2}{:<2}{:<16}{:<12}{:<9}{:<8}{}",
            "", "", "Name", "ID", "State", "Detach", "Path"
        );
        for vm in &list.all_items {
            let mut image = String::new();
            let mut name = String::new();
            let mut id = String::new();
            let mut state = String::new();
            let mut path = String::new();
            formatter.write_image(&mut image, vm);
            formatter.write_name(&mut name, vm);
            formatter.write_id(&mut id, vm);
            formatter.write_state(&mut state, vm);
            formatter.write_path(&mut path, vm);

            let mark = if list.is_selected(vm) { "*" } else { " " };
            let detach = if vm.process.should_detach() { "yes" } else { "no" };
            let line = format!(
                "  {:<2}{:<2}{:<16}{:<12}{:<9}{:<8}{}",
                mark, image, name, id, state, detach, path
            );
            if list.is_selected(vm) {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
    }

    /// Run `action` if `guard` allows it
    fn guarded(&self, name: &str, guard: bool, action: impl FnOnce(&ProcessesOperationsImpl)) {
        if guard {
            action(&self.ops);
            println!("[*] {}", name);
        } else {
            println!("{} {} is not available for the current selection", "[!]".yellow(), name);
        }
    }

    /// Execute a parsed command. Returns false when the REPL should stop.
    pub fn execute_command(&self, cmd: AppCommand) -> bool {
        let ops = &self.ops;
        match cmd {
            AppCommand::List => self.print_list(),
            AppCommand::Select(ids) => {
                let result = self.processes_vm.borrow_mut().select_ids(&ids);
                match result {
                    Ok(()) => self.print_list(),
                    Err(e) => println!("{} {}", "[!]".red(), e),
                }
            }
            AppCommand::ClearSelection => self.processes_vm.borrow_mut().clear_selection(),
            AppCommand::SelectAll => {
                self.guarded("Select all", ops.can_select_all(), |o| o.select_all())
            }
            AppCommand::Copy => self.guarded("Copied", ops.can_copy(), |o| o.copy()),
            AppCommand::Continue => {
                self.guarded("Continue", ops.can_continue_process(), |o| o.continue_process())
            }
            AppCommand::Break => self.guarded("Break", ops.can_break_process(), |o| o.break_process()),
            AppCommand::StepInto => {
                self.guarded("Step into", ops.can_step_into_process(), |o| o.step_into_process())
            }
            AppCommand::StepOver => {
                self.guarded("Step over", ops.can_step_over_process(), |o| o.step_over_process())
            }
            AppCommand::StepOut => {
                self.guarded("Step out", ops.can_step_out_process(), |o| o.step_out_process())
            }
            AppCommand::Detach => {
                self.guarded("Detach", ops.can_detach_process(), |o| o.detach_process())
            }
            AppCommand::Terminate => {
                self.guarded("Terminate", ops.can_terminate_process(), |o| o.terminate_process())
            }
            AppCommand::Attach => {
                self.guarded("Attach", ops.can_attach_to_process(), |o| o.attach_to_process())
            }
            AppCommand::ToggleDetachOnStop => self.guarded(
                "Toggle detach when debugging stopped",
                ops.can_toggle_detach_when_debugging_stopped(),
                |o| o.toggle_detach_when_debugging_stopped(),
            ),
            AppCommand::ToggleHex => {
                self.guarded("Toggle hexadecimal", ops.can_toggle_use_hexadecimal(), |o| {
                    o.toggle_use_hexadecimal()
                })
            }
            AppCommand::SetCurrent => self.guarded(
                "Set current process",
                ops.can_set_current_process(),
                |o| o.set_current_process(),
            ),
            AppCommand::Help => print_help(),
            AppCommand::Quit => {
                println!("[*] Shutting down...");
                return false;
            }
            AppCommand::Unknown(input) => {
                println!("{} Unknown command: '{}'", "[!]".red(), input);
                println!("    Type '?' for help");
            }
        }
        self.sync();
        true
    }

    fn selected_count(&self) -> usize {
        self.processes_vm.borrow().selected_items.len()
    }
}

/// Print the help message
fn print_help() {
    println!("{}", "Process List Commands".bold().cyan());
    println!("{}", "═".repeat(50).cyan());

    println!("\n{}", "Selection:".bold().yellow());
    println!("  {}             List processes", "ps".green());
    println!("  {}     Select processes", "sel <ids>".green());
    println!("  {}           Clear selection", "sel-".green());
    println!("  {}         Select all", "selall".green());
    println!("  {}           Copy selection to clipboard", "copy".green());

    println!("\n{}", "Execution:".bold().yellow());
    println!("  {}              Continue selected", "c".green());
    println!("  {}              Break selected", "b".green());
    println!("  {}     Step into/over/out", "si/so/sout".green());
    println!("  {}            Make selected process current", "cur".green());

    println!("\n{}", "Processes:".bold().yellow());
    println!("  {}         Attach to a process", "attach".green());
    println!("  {}         Detach selected", "detach".green());
    println!("  {}           Terminate selected", "kill".green());
    println!("  {}            Toggle detach when debugging stopped", "dos".green());

    println!("\n{}", "Other:".bold().yellow());
    println!("  {}            Toggle hexadecimal ids", "hex".green());
    println!("  {}              Show this help", "?".green());
    println!("  {}              Quit", "q".green());
}

/// Run the CLI REPL
pub fn run_cli(session: CliSession) -> Result<()> {
    let mut line_editor = Reedline::create();
    let mut prompt = ProcessPrompt::new();

    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║  Process List - Type '?' for help, 'q' to quit               ║".cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════╝".cyan()
    );
    session.print_list();

    loop {
        prompt.update(session.selected_count(), session.manager.current_id());
        let sig = line_editor.read_line(&prompt)?;
        match sig {
            Signal::Success(buffer) => {
                let input = buffer.trim();
                if input.is_empty() {
                    continue;
                }

                let cmd = parse_command(input);
                if !session.execute_command(cmd) {
                    break;
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\n[*] Interrupted");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::types::ProcessState;
    use crate::debug::DbgProcess;

    #[test]
    fn test_guarded_commands_drive_session() {
        let session = CliSession::new(SimManager::with_processes(2), DebuggerSettings::new());

        assert!(session.execute_command(AppCommand::Select(vec![1000])));
        assert!(session.execute_command(AppCommand::Continue));
        assert_eq!(session.manager.processes()[0].state(), ProcessState::Running);

        // Guard is false now: nothing paused in the selection
        assert!(session.execute_command(AppCommand::Continue));
        assert!(session.execute_command(AppCommand::Break));
        assert_eq!(session.manager.current_id(), Some(1000));

        assert!(session.execute_command(AppCommand::Attach));
        assert_eq!(session.processes_vm.borrow().all_items.len(), 3);

        assert!(session.execute_command(AppCommand::SelectAll));
        assert!(session.execute_command(AppCommand::Terminate));
        assert!(session.processes_vm.borrow().all_items.is_empty());
        assert_eq!(session.selected_count(), 0);

        assert!(!session.execute_command(AppCommand::Quit));
    }

    #[test]
    fn test_prompt_text() {
        let mut prompt = ProcessPrompt::new();
        prompt.update(2, Some(1004));
        assert_eq!(prompt.render_prompt_left(), "[sel:2 cur:1004]");
    }
}
