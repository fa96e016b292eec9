//! Process list state
//!
//! Holds every process known to the debugger plus the user's selection.
//! The selection is always a subset of the entries.

use std::rc::Rc;

use thiserror::Error;

use crate::debug::types::ProcessId;
use crate::debug::DbgProcess;

/// Selection errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No process with id {pid} in the process list")]
    UnknownProcess { pid: ProcessId },
}

/// One row of the process list
pub struct ProcessVm {
    /// Debugger-assigned ordering key
    pub order: usize,
    /// Main window title (empty if none)
    pub title: String,
    pub process: Rc<dyn DbgProcess>,
}

impl ProcessVm {
    pub fn new(order: usize, process: Rc<dyn DbgProcess>) -> Self {
        Self {
            order,
            title: String::new(),
            process,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Make this entry's process the debugger's current process
    pub fn select_process(&self) {
        self.process.select_as_current();
    }
}

/// All process entries and the current selection
#[derive(Default)]
pub struct ProcessesVm {
    pub all_items: Vec<Rc<ProcessVm>>,
    pub selected_items: Vec<Rc<ProcessVm>>,
}

impl ProcessesVm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping the existing selection
    pub fn add(&mut self, vm: ProcessVm) -> Rc<ProcessVm> {
        let vm = Rc::new(vm);
        self.all_items.push(vm.clone());
        vm
    }

    /// Find the entry for a process id
    pub fn find(&self, pid: ProcessId) -> Option<&Rc<ProcessVm>> {
        self.all_items.iter().find(|vm| vm.process.id() == pid)
    }

    /// Replace the selection with the entries for `pids`.
    ///
    /// Nothing changes if any id is unknown.
    pub fn select_ids(&mut self, pids: &[ProcessId]) -> Result<(), SelectionError> {
        let mut selection = Vec::with_capacity(pids.len());
        for &pid in pids {
            let vm = self
                .find(pid)
                .ok_or(SelectionError::UnknownProcess { pid })?;
            if !selection.iter().any(|s| Rc::ptr_eq(s, vm)) {
                selection.push(vm.clone());
            }
        }
        self.selected_items = selection;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected_items.clear();
    }

    pub fn is_selected(&self, vm: &Rc<ProcessVm>) -> bool {
        self.selected_items.iter().any(|s| Rc::ptr_eq(s, vm))
    }

    /// Rebuild the entries from the engine's process list.
    ///
    /// Entries whose process is still alive are kept (and stay selected);
    /// new processes get the next order key.
    pub fn sync(&mut self, processes: &[Rc<dyn DbgProcess>]) {
        let mut next_order = self.all_items.iter().map(|vm| vm.order + 1).max().unwrap_or(0);
        let mut all_items = Vec::with_capacity(processes.len());

        for process in processes {
            match self.find(process.id()) {
                Some(vm) => all_items.push(vm.clone()),
                None => {
                    all_items.push(Rc::new(ProcessVm::new(next_order, process.clone())));
                    next_order += 1;
                }
            }
        }

        self.selected_items
            .retain(|s| all_items.iter().any(|vm| Rc::ptr_eq(vm, s)));
        self.all_items = all_items;
    }
}
