//! App module - process list state, settings and REPL commands
//!
//! Provides the state the command layer operates on.

mod commands;
mod settings;
mod state;

pub use commands::*;
pub use settings::*;
pub use state::*;
