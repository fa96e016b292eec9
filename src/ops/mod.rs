//! Ops module - commands available on the process list.
//!
//! Every command is a guard (`can_*`) plus an action. Guards only read the
//! current selection, the processes' run state and the settings; actions
//! dispatch to the engine for every selected process without filtering.
//! Callers check the guard before running the action.

pub mod clipboard;
pub mod format;

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::{DebuggerSettings, ProcessVm, ProcessesVm};
use crate::debug::types::ProcessState;
use crate::debug::{AttachDialog, DbgManager};
use self::clipboard::Clipboard;
use self::format::ProcessFormatter;

/// Collaborator built on first use
pub type Deferred<T> = once_cell::unsync::Lazy<T, Box<dyn FnOnce() -> T>>;

/// Commands exposed by the process list
pub trait ProcessesOperations {
    fn can_copy(&self) -> bool;
    fn copy(&self);
    fn can_select_all(&self) -> bool;
    fn select_all(&self);
    fn can_continue_process(&self) -> bool;
    fn continue_process(&self);
    fn can_break_process(&self) -> bool;
    fn break_process(&self);
    fn can_step_into_process(&self) -> bool;
    fn step_into_process(&self);
    fn can_step_over_process(&self) -> bool;
    fn step_over_process(&self);
    fn can_step_out_process(&self) -> bool;
    fn step_out_process(&self);
    fn can_detach_process(&self) -> bool;
    fn detach_process(&self);
    fn can_terminate_process(&self) -> bool;
    fn terminate_process(&self);
    fn can_attach_to_process(&self) -> bool;
    fn attach_to_process(&self);
    fn can_toggle_detach_when_debugging_stopped(&self) -> bool;
    fn toggle_detach_when_debugging_stopped(&self);
    fn detach_when_debugging_stopped(&self) -> bool;
    fn set_detach_when_debugging_stopped(&self, value: bool);
    fn can_toggle_use_hexadecimal(&self) -> bool;
    fn toggle_use_hexadecimal(&self);
    fn use_hexadecimal(&self) -> bool;
    fn set_use_hexadecimal(&self, value: bool);
    fn can_set_current_process(&self) -> bool;
    fn set_current_process(&self);
}

/// Process list commands backed by the debugger manager
pub struct ProcessesOperationsImpl {
    processes_vm: Rc<RefCell<ProcessesVm>>,
    debugger_settings: Rc<RefCell<DebuggerSettings>>,
    dbg_manager: Deferred<Rc<dyn DbgManager>>,
    attach_dialog: Deferred<Rc<dyn AttachDialog>>,
    clipboard: Box<dyn Clipboard>,
}

impl ProcessesOperationsImpl {
    pub fn new(
        processes_vm: Rc<RefCell<ProcessesVm>>,
        debugger_settings: Rc<RefCell<DebuggerSettings>>,
        dbg_manager: Box<dyn FnOnce() -> Rc<dyn DbgManager>>,
        attach_dialog: Box<dyn FnOnce() -> Rc<dyn AttachDialog>>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            processes_vm,
            debugger_settings,
            dbg_manager: Deferred::new(dbg_manager),
            attach_dialog: Deferred::new(attach_dialog),
            clipboard,
        }
    }

    fn selected_count(&self) -> usize {
        self.processes_vm.borrow().selected_items.len()
    }

    /// Snapshot of the selection so no borrow is held across engine calls
    fn selected_items(&self) -> Vec<Rc<ProcessVm>> {
        self.processes_vm.borrow().selected_items.clone()
    }

    // TODO: use view order once the list supports sorting by column
    fn sorted_selected_items(&self) -> Vec<Rc<ProcessVm>> {
        let mut items = self.selected_items();
        items.sort_by_key(|vm| vm.order);
        items
    }

    fn any_selected_in(&self, state: ProcessState) -> bool {
        self.processes_vm
            .borrow()
            .selected_items
            .iter()
            .any(|vm| vm.process.state() == state)
    }

    fn has_current_process(&self) -> bool {
        self.dbg_manager.current_process().is_some()
    }
}

impl ProcessesOperations for ProcessesOperationsImpl {
    fn can_copy(&self) -> bool {
        self.selected_count() != 0
    }

    fn copy(&self) {
        let current = self.dbg_manager.current_process().map(|p| p.id());
        let formatter = ProcessFormatter::new(self.use_hexadecimal(), current);

        let mut output = String::new();
        for vm in self.sorted_selected_items() {
            formatter.write_row(&mut output, &vm);
        }

        if !output.is_empty() {
            if let Err(e) = self.clipboard.set_text(&output) {
                log::debug!("Ignoring clipboard error: {}", e);
            }
        }
    }

    fn can_select_all(&self) -> bool {
        let list = self.processes_vm.borrow();
        list.selected_items.len() != list.all_items.len()
    }

    fn select_all(&self) {
        let mut list = self.processes_vm.borrow_mut();
        let all = list.all_items.clone();
        list.selected_items.clear();
        list.selected_items.extend(all);
    }

    fn can_continue_process(&self) -> bool {
        self.any_selected_in(ProcessState::Paused)
    }

    fn continue_process(&self) {
        for vm in self.selected_items() {
            log::debug!("Continue {}", vm.process.id());
            vm.process.run();
        }
    }

    fn can_break_process(&self) -> bool {
        self.any_selected_in(ProcessState::Running)
    }

    fn break_process(&self) {
        for vm in self.selected_items() {
            log::debug!("Break {}", vm.process.id());
            vm.process.break_process();
        }
    }

    fn can_step_into_process(&self) -> bool {
        self.has_current_process()
    }

    // Stepping is not wired to the engine yet
    fn step_into_process(&self) {
        log::debug!("Step into: not supported");
    }

    fn can_step_over_process(&self) -> bool {
        self.has_current_process()
    }

    fn step_over_process(&self) {
        log::debug!("Step over: not supported");
    }

    fn can_step_out_process(&self) -> bool {
        self.has_current_process()
    }

    fn step_out_process(&self) {
        log::debug!("Step out: not supported");
    }

    fn can_detach_process(&self) -> bool {
        self.selected_count() != 0
    }

    fn detach_process(&self) {
        for vm in self.selected_items() {
            log::info!("Detaching from process {}", vm.process.id());
            vm.process.detach();
        }
    }

    fn can_terminate_process(&self) -> bool {
        self.selected_count() != 0
    }

    fn terminate_process(&self) {
        for vm in self.selected_items() {
            log::info!("Terminating process {}", vm.process.id());
            vm.process.terminate();
        }
    }

    fn can_attach_to_process(&self) -> bool {
        true
    }

    fn attach_to_process(&self) {
        log::info!("Showing attach to process dialog");
        self.attach_dialog.attach();
    }

    fn can_toggle_detach_when_debugging_stopped(&self) -> bool {
        self.selected_count() != 0
    }

    fn toggle_detach_when_debugging_stopped(&self) {
        self.set_detach_when_debugging_stopped(!self.detach_when_debugging_stopped());
    }

    fn detach_when_debugging_stopped(&self) -> bool {
        let list = self.processes_vm.borrow();
        !list.selected_items.is_empty()
            && list.selected_items.iter().all(|vm| vm.process.should_detach())
    }

    fn set_detach_when_debugging_stopped(&self, value: bool) {
        for vm in self.selected_items() {
            vm.process.set_should_detach(value);
        }
    }

    fn can_toggle_use_hexadecimal(&self) -> bool {
        true
    }

    fn toggle_use_hexadecimal(&self) {
        self.set_use_hexadecimal(!self.use_hexadecimal());
    }

    fn use_hexadecimal(&self) -> bool {
        self.debugger_settings.borrow().use_hexadecimal
    }

    fn set_use_hexadecimal(&self, value: bool) {
        self.debugger_settings.borrow_mut().use_hexadecimal = value;
    }

    fn can_set_current_process(&self) -> bool {
        let list = self.processes_vm.borrow();
        list.selected_items.len() == 1 && list.selected_items[0].process.state() == ProcessState::Paused
    }

    fn set_current_process(&self) {
        if !self.can_set_current_process() {
            return;
        }
        if let Some(vm) = self.selected_items().first() {
            log::debug!("Setting current process {}", vm.process.id());
            vm.select_process();
        }
    }
}
