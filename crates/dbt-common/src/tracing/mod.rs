//! Structured logging helpers built on the `tracing` crate.

pub mod emit;
pub mod init;
