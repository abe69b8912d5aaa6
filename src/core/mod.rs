//! Core infrastructure: configuration and the coded error taxonomy.

pub mod config;
pub mod errors;
