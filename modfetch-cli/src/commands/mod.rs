//! CLI subcommands.

pub mod common;
pub mod config;
pub mod fetch;
pub mod paths;
pub mod resolve;
