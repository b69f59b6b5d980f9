//! Adapter implementations of the port traits.
//!
//! - `live`: real child processes.
//! - `recording`: wraps another adapter and writes a cassette.
//! - `replaying`: serves recorded outputs from a cassette.

pub mod live;
pub mod recording;
pub mod replaying;
