// src/exec/mod.rs

//! Process execution layer.
//!
//! Every external program invoicebot starts (checkout, runtime version
//! version check, dependency install, generator) goes through a [`CommandRunner`].
//!
//! - [`backend`] defines the trait and the request/response types.
//! - [`command`] is the production runner built on `tokio::process`.

pub mod backend;
pub mod command;

pub use backend::{CommandOutput, CommandRunner, CommandSpec};
pub use command::ShellCommandRunner;
