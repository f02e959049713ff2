// CLI module

pub mod args;

pub use args::{CheckArgs, Cli, Commands, InspectArgs};
