//! UI module - user-facing frontends over the process list

pub mod cli;
