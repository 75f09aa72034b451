//! Chat sessionizer CLI library.
//!
//! This crate provides the CLI interface for the chat transcript sessionizer.

mod cli;
pub mod commands;
mod config;
pub mod output;

pub use cli::{Cli, Commands, GapArgs};
pub use config::Config;
