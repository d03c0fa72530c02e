//! Campus navigation CLI library.
//!
//! Subcommand definitions and handlers, result rendering, and terminal
//! styling for the `campusnav-cli` binary.

pub mod commands;
pub mod output;
pub mod terminal;
