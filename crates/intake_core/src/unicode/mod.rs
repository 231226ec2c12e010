//! UTF-8 decoding and character classification helpers.
//!
//! The scan buffer deals in code units (bytes); readers deal in code points.
//! This module bridges the two: sequence-length lookup from a lead byte,
//! validated decoding of a single code point from a byte prefix, and the
//! digit/sign/whitespace classification shared by the numeric readers.

/// Sentinel digit value returned by [`char_to_digit`] for non-digit bytes.
///
/// Larger than any valid base (36), so `char_to_digit(b) < base` is a
/// complete digit test.
pub const NOT_A_DIGIT: u32 = u32::MAX;

/// Returns the length in bytes of the UTF-8 sequence introduced by `lead`,
/// or `None` when `lead` cannot start a sequence (continuation or invalid).
#[inline]
pub fn utf8_sequence_length(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Decode the first code point of `bytes`.
///
/// Returns the code point and the number of bytes it occupies, or `None` when
/// the prefix is not a valid UTF-8 sequence (including truncated sequences,
/// overlong encodings, and surrogates).
pub fn decode_code_point(bytes: &[u8]) -> Option<(char, usize)> {
    let lead = *bytes.first()?;
    let len = utf8_sequence_length(lead)?;
    if bytes.len() < len {
        return None;
    }
    let s = std::str::from_utf8(&bytes[..len]).ok()?;
    s.chars().next().map(|c| (c, len))
}

/// Map an ASCII byte to its digit value in bases up to 36.
///
/// `'0'..='9'` map to 0–9, `'a'..='z'` and `'A'..='Z'` to 10–35. Everything
/// else maps to [`NOT_A_DIGIT`], so `char_to_digit(b) < base` tests digit
/// membership in one comparison.
#[inline]
pub fn char_to_digit(byte: u8) -> u32 {
    match byte {
        b'0'..=b'9' => u32::from(byte - b'0'),
        b'a'..=b'z' => u32::from(byte - b'a') + 10,
        b'A'..=b'Z' => u32::from(byte - b'A') + 10,
        _ => NOT_A_DIGIT,
    }
}

/// ASCII whitespace as the C locale defines it: space, `\t`, `\n`, `\v`,
/// `\f`, `\r`.
#[inline]
pub fn is_ascii_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

/// Returns the earliest (minimum) of two optional positions.
///
/// Combines results from separate memchr calls when we need to search for
/// more needle bytes than `memchr3` supports.
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Find the byte offset of the first Unicode whitespace code point in
/// `haystack`, or `None` if there is none.
///
/// Fast path: memchr over the candidate lead bytes. Every Unicode whitespace
/// code point is either ASCII whitespace or a multi-byte sequence starting
/// with `0xC2`, `0xE1`, `0xE2`, or `0xE3`; candidates found by memchr are
/// verified by decoding, so a non-whitespace code point that merely shares a
/// lead byte (for example `©`, `0xC2 0xA9`) is skipped over.
pub fn find_whitespace(haystack: &[u8]) -> Option<usize> {
    let mut offset = 0;
    while offset < haystack.len() {
        let rest = &haystack[offset..];
        let ascii = earliest_of(
            memchr::memchr3(b' ', b'\n', b'\t', rest),
            memchr::memchr3(b'\r', b'\x0B', b'\x0C', rest),
        );
        let multibyte = earliest_of(
            memchr::memchr3(0xC2, 0xE1, 0xE2, rest),
            memchr::memchr(0xE3, rest),
        );
        let candidate = earliest_of(ascii, multibyte)?;

        let at = offset + candidate;
        if haystack[at].is_ascii() {
            return Some(at);
        }
        match decode_code_point(&haystack[at..]) {
            Some((cp, len)) => {
                if cp.is_whitespace() {
                    return Some(at);
                }
                offset = at + len;
            }
            // Invalid sequence sharing a candidate lead byte; step past it.
            None => offset = at + 1,
        }
    }
    None
}

/// Scalar reference for [`find_whitespace`], kept for property testing.
#[cfg(test)]
pub(crate) fn scalar_find_whitespace(haystack: &[u8]) -> Option<usize> {
    let mut offset = 0;
    while offset < haystack.len() {
        match decode_code_point(&haystack[offset..]) {
            Some((cp, len)) => {
                if cp.is_whitespace() {
                    return Some(offset);
                }
                offset += len;
            }
            None => offset += 1,
        }
    }
    None
}
