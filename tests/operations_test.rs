//! Integration tests for the process list commands over a simulated session
//!
//! Run with: cargo test --test operations_test

use std::cell::RefCell;
use std::rc::Rc;

use procops::app::{DebuggerSettings, ProcessVm, ProcessesVm};
use procops::debug::sim::{SimAttachDialog, SimManager};
use procops::debug::types::ProcessState;
use procops::debug::{AttachDialog, DbgManager, DbgProcess};
use procops::ops::clipboard::{Clipboard, ClipboardError};
use procops::ops::format::LINE_ENDING;
use procops::ops::{ProcessesOperations, ProcessesOperationsImpl};

/// Keeps whatever was copied last
#[derive(Clone, Default)]
struct MemoryClipboard {
    text: Rc<RefCell<Option<String>>>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.text.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

struct Setup {
    manager: SimManager,
    list: Rc<RefCell<ProcessesVm>>,
    clipboard: MemoryClipboard,
    ops: ProcessesOperationsImpl,
}

fn setup(manager: SimManager, list: ProcessesVm) -> Setup {
    let list = Rc::new(RefCell::new(list));
    let clipboard = MemoryClipboard::default();
    let dbg_manager = manager.clone();
    let dialog_manager = manager.clone();

    let ops = ProcessesOperationsImpl::new(
        list.clone(),
        Rc::new(RefCell::new(DebuggerSettings::new())),
        Box::new(move || Rc::new(dbg_manager) as Rc<dyn DbgManager>),
        Box::new(move || Rc::new(SimAttachDialog::new(dialog_manager)) as Rc<dyn AttachDialog>),
        Box::new(clipboard.clone()),
    );

    Setup {
        manager,
        list,
        clipboard,
        ops,
    }
}

fn synced(count: usize) -> Setup {
    let manager = SimManager::with_processes(count);
    let mut list = ProcessesVm::new();
    list.sync(&manager.processes());
    setup(manager, list)
}

#[test]
fn test_copy_uses_order_key_not_selection_order() {
    let manager = SimManager::new();
    let p1 = manager.spawn("one.exe", "/one", ProcessState::Paused);
    let p2 = manager.spawn("two.exe", "/two", ProcessState::Running);

    let mut list = ProcessesVm::new();
    list.add(ProcessVm::new(2, p1));
    list.add(ProcessVm::new(1, p2).with_title("Two"));
    list.select_ids(&[1000, 1004]).unwrap();

    let s = setup(manager, list);
    s.ops.copy();

    let expected = format!(
        "\ttwo.exe\t1004\tTwo\tRunning\tNative\t/two{le}\tone.exe\t1000\t\tPaused\tNative\t/one{le}",
        le = LINE_ENDING
    );
    assert_eq!(s.clipboard.text.borrow().as_deref(), Some(expected.as_str()));
}

#[test]
fn test_copy_marks_current_process_and_uses_hex() {
    let s = synced(2);
    s.manager.processes()[1].select_as_current();
    s.list.borrow_mut().select_ids(&[1004]).unwrap();
    s.ops.set_use_hexadecimal(true);

    s.ops.copy();

    let text = s.clipboard.text.borrow().clone().unwrap();
    assert!(text.starts_with(">\ttarget1.exe\t0x000003EC\t"));
}

#[test]
fn test_select_all_then_guard_is_false() {
    let s = synced(3);
    assert!(s.ops.can_select_all());

    s.ops.select_all();
    assert_eq!(s.list.borrow().selected_items.len(), 3);
    assert!(!s.ops.can_select_all());
}

#[test]
fn test_break_then_set_current() {
    let s = synced(2);
    s.ops.select_all();
    s.ops.continue_process();
    assert!(s.manager.processes().iter().all(|p| p.state() == ProcessState::Running));
    assert!(!s.ops.can_continue_process());
    assert!(!s.ops.can_step_into_process());

    s.ops.break_process();
    assert!(s.manager.processes().iter().all(|p| p.state() == ProcessState::Paused));
    assert!(s.ops.can_step_over_process());

    s.list.borrow_mut().select_ids(&[1004]).unwrap();
    assert!(s.ops.can_set_current_process());
    s.ops.set_current_process();
    assert_eq!(s.manager.current_id(), Some(1004));
}

#[test]
fn test_detach_removes_process_after_sync() {
    let s = synced(2);
    s.list.borrow_mut().select_ids(&[1000]).unwrap();

    s.ops.detach_process();
    let processes = s.manager.processes();
    s.list.borrow_mut().sync(&processes);

    let list = s.list.borrow();
    assert_eq!(list.all_items.len(), 1);
    assert!(list.selected_items.is_empty());
    drop(list);
    assert!(!s.ops.can_detach_process());
    assert!(!s.ops.can_terminate_process());
}

#[test]
fn test_attach_adds_process() {
    let s = synced(0);
    assert!(s.ops.can_attach_to_process());

    s.ops.attach_to_process();
    assert_eq!(s.manager.process_count(), 1);
}

#[test]
fn test_toggle_detach_when_debugging_stopped_round_trip() {
    let s = synced(2);
    s.ops.select_all();
    assert!(!s.ops.detach_when_debugging_stopped());

    s.ops.toggle_detach_when_debugging_stopped();
    assert!(s.ops.detach_when_debugging_stopped());
    assert!(s.manager.processes().iter().all(|p| p.should_detach()));

    s.ops.toggle_detach_when_debugging_stopped();
    assert!(s.manager.processes().iter().all(|p| !p.should_detach()));
}
