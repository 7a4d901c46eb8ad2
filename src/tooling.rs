//! Tooling
//!
//! Command-line front end for the daily folder API.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, ConfigCommands};
