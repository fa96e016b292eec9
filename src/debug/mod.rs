//! Debug module - engine-facing collaborator contracts.
//!
//! The process list never talks to the OS directly. Everything it needs
//! from the debugger goes through these traits:
//! - Per-process control (run/break/detach/terminate)
//! - The manager's current process
//! - The attach workflow

pub mod sim;
pub mod types;

use std::rc::Rc;

use types::{ProcessId, ProcessState};

/// Engine handle for one debugged process.
///
/// Control calls are fire-and-forget: failures are reported by the engine
/// through later state changes, not through return values.
#[cfg_attr(test, mockall::automock)]
pub trait DbgProcess {
    /// OS process ID
    fn id(&self) -> ProcessId;

    /// Executable name
    fn name(&self) -> String;

    /// Full path of the executable
    fn filename(&self) -> String;

    /// Runtime(s) being debugged in this process
    fn debugging(&self) -> String;

    /// Current run state
    fn state(&self) -> ProcessState;

    /// Detach instead of terminating when debugging stops
    fn should_detach(&self) -> bool;

    fn set_should_detach(&self, value: bool);

    /// Resume execution
    fn run(&self);

    /// Pause execution
    fn break_process(&self);

    fn detach(&self);

    fn terminate(&self);

    /// Make this the manager's current process
    fn select_as_current(&self);
}

/// The debugger manager, as far as the process list is concerned.
#[cfg_attr(test, mockall::automock)]
pub trait DbgManager {
    /// Process that stepping applies to, if any
    fn current_process(&self) -> Option<Rc<dyn DbgProcess>>;
}

/// Starts the external attach-to-process workflow.
#[cfg_attr(test, mockall::automock)]
pub trait AttachDialog {
    fn attach(&self);
}
