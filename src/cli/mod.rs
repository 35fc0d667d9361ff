//! Command-line front-end over the query operations

pub mod commands;
pub mod display;
pub mod query;

pub use self::commands::{CliArgs, Commands};
