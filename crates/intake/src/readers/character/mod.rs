//! Character reader: a single code point, or an exact-length raw code-unit
//! buffer.
//!
//! Neither form skips leading whitespace; a space is as good a character as
//! any other.

use intake_core::{ScanBuffer, ScanError, ScanResult};

/// Read one code point.
pub(crate) fn read_char(buffer: &mut ScanBuffer<'_>) -> ScanResult<char> {
    match buffer.peek_char()? {
        Some((cp, len)) => {
            buffer.advance(len);
            Ok(cp)
        }
        None => Err(ScanError::end_of_input("expected a character")),
    }
}

/// Fill `out` with exactly `out.len()` code units.
///
/// A short source is an `end_of_input` failure; the driver rewinds, so
/// partial progress does not matter.
pub(crate) fn read_byte_span(buffer: &mut ScanBuffer<'_>, out: &mut [u8]) -> ScanResult<()> {
    for slot in out.iter_mut() {
        match buffer.get()? {
            Some(b) => *slot = b,
            None => {
                return Err(ScanError::end_of_input(
                    "source ended before the buffer was filled",
                ))
            }
        }
    }
    Ok(())
}
