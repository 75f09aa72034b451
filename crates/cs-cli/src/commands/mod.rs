//! CLI subcommand implementations.

pub mod import;
pub mod parse;
pub mod sessions;
pub mod status;
pub mod util;
