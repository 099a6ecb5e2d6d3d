//! Library side of the `weatherbot` binary.
//!
//! - `cli`: argument parsing and session startup
//! - `credentials`: API key resolution and prompting
//! - `dispatcher`: the read-eval loop and its command handlers
//! - `command`: parsing one line of input into a verb and arguments
//! - `notification`: the in-memory notification log
//! - `console`: output sink with optional color

pub mod cli;
pub mod command;
pub mod console;
pub mod credentials;
pub mod dispatcher;
pub mod logging;
pub mod notification;
