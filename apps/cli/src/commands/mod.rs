//! Command implementations for the Herald CLI.

pub mod config;
pub mod run;
pub mod strings;
