//! Shared building blocks for the FabricSpark adapter crates: error types,
//! the adapter type tag, and tracing helpers.

#[macro_use]
mod macros;

pub mod adapter;
pub mod errors;
pub mod tracing;

pub use adapter::AdapterType;
pub use errors::{AdapterError, AdapterErrorKind, AdapterResult, ErrorCode, FsError, FsResult};
