//! UCI front end.
//!
//! Reads line-oriented commands, keeps the current game, runs the engine on
//! `go` and answers with `bestmove`. Logging goes to stderr; stdout carries
//! protocol text only.

pub mod command;
pub mod config;
pub mod driver;

pub use command::{Command, CommandError, Setup};
pub use config::{ConfigError, EngineConfig};
pub use driver::{Driver, State};
