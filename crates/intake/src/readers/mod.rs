//! Typed readers, one per argument category.
//!
//! Every reader takes the scan buffer at the field's start position and
//! either consumes a value or fails without any promise about the position;
//! the driver rewinds to the field start on failure.

pub(crate) mod boolean;
pub(crate) mod character;
pub(crate) mod float;
pub(crate) mod int;
pub(crate) mod numeric;
pub(crate) mod string;

use intake_core::{ErrorCode, ScanBuffer, ScanError, ScanResult};

/// Sign read off the front of a numeric field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Sign {
    /// No sign present.
    Default,
    /// Explicit `+`.
    Plus,
    /// Explicit `-`.
    Minus,
}

impl Sign {
    pub(crate) fn is_minus(self) -> bool {
        self == Self::Minus
    }
}

/// Consume an optional `+`/`-`.
pub(crate) fn read_sign(buffer: &mut ScanBuffer<'_>) -> ScanResult<Sign> {
    match buffer.peek()? {
        Some(b'+') => {
            buffer.advance(1);
            Ok(Sign::Plus)
        }
        Some(b'-') => {
            buffer.advance(1);
            Ok(Sign::Minus)
        }
        _ => Ok(Sign::Default),
    }
}

/// Consume a run of Unicode whitespace. Zero-length runs are fine.
///
/// Invalid encoding is not whitespace; the run simply ends there.
pub(crate) fn skip_whitespace(buffer: &mut ScanBuffer<'_>) -> ScanResult<()> {
    loop {
        match buffer.peek_char() {
            Ok(Some((cp, len))) if cp.is_whitespace() => buffer.advance(len),
            Ok(_) => return Ok(()),
            Err(e) if e.code() == ErrorCode::InvalidScannedValue => return Ok(()),
            Err(e) => return Err(e),
        }
    }
}

/// Match `expected` (ASCII) case-insensitively at the current position.
///
/// Consumes and returns `true` on a match; leaves the position untouched
/// otherwise.
pub(crate) fn eat_ascii_nocase(buffer: &mut ScanBuffer<'_>, expected: &str) -> ScanResult<bool> {
    let ahead = buffer.lookahead(expected.len())?;
    if ahead.len() == expected.len() && ahead.eq_ignore_ascii_case(expected.as_bytes()) {
        buffer.advance(expected.len());
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Match `expected` exactly at the current position.
///
/// Consumes and returns `true` on a match; leaves the position untouched
/// otherwise.
pub(crate) fn eat_exact(buffer: &mut ScanBuffer<'_>, expected: &str) -> ScanResult<bool> {
    let ahead = buffer.lookahead(expected.len())?;
    if ahead == expected.as_bytes() {
        buffer.advance(expected.len());
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Consume one code unit if it equals `expected`.
pub(crate) fn eat_byte(buffer: &mut ScanBuffer<'_>, expected: u8) -> ScanResult<bool> {
    if buffer.peek()? == Some(expected) {
        buffer.advance(1);
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Error for a reader that matched nothing: `end_of_input` when the source
/// is exhausted (the reader demanded at least one more code unit),
/// `otherwise` when content was present but did not match.
pub(crate) fn fail_empty(buffer: &mut ScanBuffer<'_>, otherwise: ScanError) -> ScanError {
    match buffer.peek() {
        Ok(None) => ScanError::end_of_input("source exhausted"),
        _ => otherwise,
    }
}

/// True when `byte` is a digit of `base` (bases up to 36).
#[inline]
pub(crate) fn digit_in_base(byte: u8, base: u32) -> bool {
    intake_core::unicode::char_to_digit(byte) < base
}

/// Consume one code point if it equals `expected`.
pub(crate) fn eat_char(buffer: &mut ScanBuffer<'_>, expected: char) -> ScanResult<bool> {
    match buffer.peek_char() {
        Ok(Some((cp, len))) if cp == expected => {
            buffer.advance(len);
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(e) if e.code() == ErrorCode::InvalidScannedValue => Ok(false),
        Err(e) => Err(e),
    }
}
