//! Command line interface

pub mod commands;
pub mod display;
pub mod lb;

pub use commands::{CliArgs, Commands, GlobalArgs};
