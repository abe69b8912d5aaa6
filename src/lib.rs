//! Destructive-command advisor: warns before reboot/shutdown, recursive
//! removal, or configured dangerous commands, and reports what a recursive
//! removal would destroy. Nothing here ever executes the command.

pub mod advisor;
pub mod core;
pub mod logger;
pub mod report;
pub mod scanner;
