//! Port traits defining external boundaries.
//!
//! The only boundary this service crosses is the process table: the model
//! downloader and the inference binary are both separately installed
//! executables. Implementations live in `src/adapters/`.

pub mod process;

pub use process::{Invocation, ProcessOutput, ProcessRunner};
