//! Low-level scanning primitives for the intake workspace.
//!
//! This crate is standalone: it knows nothing about format strings or typed
//! readers. It provides the pieces everything else is built on:
//!
//! - [`ScanBuffer`]: a uniform, rewindable view over a source (contiguous
//!   string, code-unit iterator, or byte stream) with bounded lookahead.
//! - [`ScanError`] / [`ErrorCode`] / [`ScanResult`]: the error taxonomy
//!   threaded through every fallible operation in the workspace.
//! - [`unicode`]: UTF-8 decoding and character classification helpers.
//! - [`width`]: text-width estimation for width-bounded reads.

mod buffer;
mod error;
pub mod unicode;
pub mod width;

pub use buffer::ScanBuffer;
pub use error::{ErrorCode, ScanError, ScanResult};
