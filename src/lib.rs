//! procops - process list commands for a multi-process debugger
//!
//! The library exposes the engine-facing contracts (`debug`), the process
//! list state (`app`), and the guard/action command layer (`ops`).

pub mod app;
pub mod debug;
pub mod ops;
pub mod ui;
