//! Simulated debugger session.
//!
//! Backs the headless REPL so the process list commands can be driven
//! without a real engine. Processes only change state in memory.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::types::{ProcessId, ProcessState};
use super::{AttachDialog, DbgManager, DbgProcess};

const FIRST_PID: ProcessId = 1000;
const PID_STEP: ProcessId = 4;

#[derive(Default)]
struct Session {
    processes: RefCell<Vec<Rc<SimProcess>>>,
    current: RefCell<Option<Weak<SimProcess>>>,
    next_id: Cell<ProcessId>,
}

impl Session {
    fn is_current(&self, pid: ProcessId) -> bool {
        self.current
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .is_some_and(|p| p.id == pid)
    }

    fn set_current(&self, process: Option<Weak<SimProcess>>) {
        *self.current.borrow_mut() = process;
    }

    fn remove(&self, pid: ProcessId) {
        self.processes.borrow_mut().retain(|p| p.id != pid);
        if self.is_current(pid) {
            self.set_current(None);
        }
    }
}

/// In-memory debugger manager
#[derive(Clone)]
pub struct SimManager {
    session: Rc<Session>,
}

impl SimManager {
    pub fn new() -> Self {
        let session = Session::default();
        session.next_id.set(FIRST_PID);
        Self {
            session: Rc::new(session),
        }
    }

    /// Create a session with `count` paused processes
    pub fn with_processes(count: usize) -> Self {
        let manager = Self::new();
        for i in 0..count {
            let name = format!("target{}.exe", i);
            let path = format!("C:\\work\\bin\\{}", name);
            manager.spawn(&name, &path, ProcessState::Paused);
        }
        manager
    }

    /// Add a process to the session
    pub fn spawn(&self, name: &str, filename: &str, state: ProcessState) -> Rc<SimProcess> {
        let id = self.session.next_id.get();
        self.session.next_id.set(id + PID_STEP);

        let session = Rc::downgrade(&self.session);
        let process = Rc::new_cyclic(|me| SimProcess {
            me: me.clone(),
            session,
            id,
            name: name.to_string(),
            filename: filename.to_string(),
            state: Cell::new(state),
            should_detach: Cell::new(false),
        });

        log::debug!("Session: spawned {} ({}) {}", name, id, state);
        self.session.processes.borrow_mut().push(process.clone());
        process
    }

    /// Processes in attach order
    pub fn processes(&self) -> Vec<Rc<dyn DbgProcess>> {
        self.session
            .processes
            .borrow()
            .iter()
            .map(|p| p.clone() as Rc<dyn DbgProcess>)
            .collect()
    }

    pub fn process_count(&self) -> usize {
        self.session.processes.borrow().len()
    }

    pub fn current_id(&self) -> Option<ProcessId> {
        self.current_process().map(|p| p.id())
    }
}

impl Default for SimManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DbgManager for SimManager {
    fn current_process(&self) -> Option<Rc<dyn DbgProcess>> {
        self.session
            .current
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|p| p as Rc<dyn DbgProcess>)
    }
}

/// A process living in a [`SimManager`] session
pub struct SimProcess {
    me: Weak<SimProcess>,
    session: Weak<Session>,
    id: ProcessId,
    name: String,
    filename: String,
    state: Cell<ProcessState>,
    should_detach: Cell<bool>,
}

impl SimProcess {
    fn with_session(&self, f: impl FnOnce(&Session)) {
        if let Some(session) = self.session.upgrade() {
            f(&session);
        }
    }
}

impl DbgProcess for SimProcess {
    fn id(&self) -> ProcessId {
        self.id
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn filename(&self) -> String {
        self.filename.clone()
    }

    fn debugging(&self) -> String {
        "Native".to_string()
    }

    fn state(&self) -> ProcessState {
        self.state.get()
    }

    fn should_detach(&self) -> bool {
        self.should_detach.get()
    }

    fn set_should_detach(&self, value: bool) {
        self.should_detach.set(value);
    }

    fn run(&self) {
        self.state.set(ProcessState::Running);
    }

    fn break_process(&self) {
        self.state.set(ProcessState::Paused);
        // First process to break becomes current
        let me = self.me.clone();
        self.with_session(|s| {
            if s.current.borrow().as_ref().and_then(Weak::upgrade).is_none() {
                s.set_current(Some(me));
            }
        });
    }

    fn detach(&self) {
        log::info!("Session: detached from {} ({})", self.name, self.id);
        self.with_session(|s| s.remove(self.id));
    }

    fn terminate(&self) {
        log::info!("Session: terminated {} ({})", self.name, self.id);
        self.with_session(|s| s.remove(self.id));
    }

    fn select_as_current(&self) {
        let me = self.me.clone();
        self.with_session(|s| s.set_current(Some(me)));
    }
}

/// Attach workflow that adds a fresh paused process to the session
pub struct SimAttachDialog {
    manager: SimManager,
}

impl SimAttachDialog {
    pub fn new(manager: SimManager) -> Self {
        Self { manager }
    }
}

impl AttachDialog for SimAttachDialog {
    fn attach(&self) {
        let n = self.manager.process_count();
        let name = format!("attached{}.exe", n);
        let path = format!("C:\\work\\attach\\{}", name);
        let process = self.manager.spawn(&name, &path, ProcessState::Paused);
        log::info!("Session: attached to {} ({})", name, process.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let manager = SimManager::with_processes(3);
        let ids: Vec<_> = manager.processes().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![1000, 1004, 1008]);
    }

    #[test]
    fn test_break_sets_current_once() {
        let manager = SimManager::new();
        let a = manager.spawn("a.exe", "/a", ProcessState::Running);
        let b = manager.spawn("b.exe", "/b", ProcessState::Running);

        b.break_process();
        a.break_process();
        assert_eq!(manager.current_id(), Some(b.id()));

        a.select_as_current();
        assert_eq!(manager.current_id(), Some(a.id()));
    }

    #[test]
    fn test_terminate_removes_and_clears_current() {
        let manager = SimManager::new();
        let a = manager.spawn("a.exe", "/a", ProcessState::Paused);
        a.select_as_current();

        a.terminate();
        assert_eq!(manager.process_count(), 0);
        assert!(manager.current_process().is_none());
    }

    #[test]
    fn test_attach_dialog_adds_paused_process() {
        let manager = SimManager::new();
        SimAttachDialog::new(manager.clone()).attach();

        let processes = manager.processes();
        assert_eq!(processes.len(), 1);
        assert_eq!(processes[0].state(), ProcessState::Paused);
    }
}
