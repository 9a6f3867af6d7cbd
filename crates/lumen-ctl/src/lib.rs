pub mod cli;
pub mod commands;
pub mod error;
pub mod tracing_init;
