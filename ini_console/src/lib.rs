//! # INI Console
//!
//! Command-line front end for the streaming INI editor.
//!
//! ## Philosophy
//!
//! - **One command per run**: open, act, close
//! - **Bounded memory**: the file is only ever seen through the window
//! - **Scriptable output**: values and listings go to stdout, logs to stderr
//!
//! ## Non-Responsibilities
//!
//! The console does NOT:
//! - Create sections or delete keys
//! - Make edits atomic (edit a copy and rename it if that matters)

pub mod commands;
pub mod runtime;

pub use commands::{Command, CommandError, DEFAULT_SECTION};
pub use runtime::{run, ConsoleConfig, ConsoleError, DEFAULT_WINDOW};
