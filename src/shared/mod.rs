/// Shared kernel - error types, the crate-wide Result alias and
/// process-scoped resource cleanup
pub mod cleanup;
pub mod error;
pub mod result;
pub mod security;

pub use error::{ExitCode, SbomError};
pub use result::Result;
