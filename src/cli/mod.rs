// mod.rs - CLI module

pub mod args;
pub mod command;
pub mod config;

// Re-export main types for convenience
pub use args::Args;
pub use command::{build_command, parse_command_line, split_matches, CommandLine, GatheredCommand};
pub use config::CommandDescription;
