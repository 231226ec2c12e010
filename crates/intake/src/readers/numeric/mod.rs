//! Shared machinery for the integer and float readers.
//!
//! Overflow detection uses the digit-count-then-magnitude discipline: a
//! parse of `n` digits in base `b` can only have wrapped a `u64` when `n`
//! exceeds the maximum digit count for `b`, or equals it with a suspiciously
//! small accumulated value. Destination range checks come after, counting
//! the sign.
//!
//! The decimal fast path parses eight ASCII digits per step with SWAR; the
//! scalar reference stays next to it for property testing.

use intake_core::{ScanBuffer, ScanError, ScanResult};
use smallvec::SmallVec;

/// Destination integer types the scanner can produce.
pub(crate) trait ScanInteger: Copy {
    /// True for two's-complement signed destinations.
    const SIGNED: bool;
    /// Maximum positive magnitude as a `u64`.
    const MAX_MAGNITUDE: u64;
    /// Reassemble from an accumulated magnitude and sign.
    ///
    /// # Contract
    ///
    /// `magnitude` has passed [`check_overflow`] for this type.
    fn from_magnitude(magnitude: u64, negative: bool) -> Self;
}

macro_rules! impl_scan_integer {
    (signed: $($ty:ty),*) => {$(
        impl ScanInteger for $ty {
            const SIGNED: bool = true;
            #[allow(clippy::cast_sign_loss, reason = "MAX of a signed type is nonnegative")]
            const MAX_MAGNITUDE: u64 = <$ty>::MAX as u64;
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            fn from_magnitude(magnitude: u64, negative: bool) -> Self {
                if negative {
                    // Two's-complement truncation maps 2^63 to i64::MIN etc.
                    magnitude.wrapping_neg() as $ty
                } else {
                    magnitude as $ty
                }
            }
        }
    )*};
    (unsigned: $($ty:ty),*) => {$(
        impl ScanInteger for $ty {
            const SIGNED: bool = false;
            const MAX_MAGNITUDE: u64 = <$ty>::MAX as u64;
            #[allow(clippy::cast_possible_truncation)]
            fn from_magnitude(magnitude: u64, negative: bool) -> Self {
                debug_assert!(!negative, "unsigned destination with negative sign");
                magnitude as $ty
            }
        }
    )*};
}

impl_scan_integer!(signed: i8, i16, i32, i64, isize);
impl_scan_integer!(unsigned: u8, u16, u32, u64, usize);

/// Number of digits `u64::MAX` has in `base`.
pub(crate) const fn max_digits_u64(base: u32) -> u32 {
    let mut count = 0;
    let mut value = u64::MAX;
    while value > 0 {
        value /= base as u64;
        count += 1;
    }
    count
}

/// `base` raised to `max_digits_u64(base) - 1`: the smallest value a
/// non-wrapped parse of the maximum digit count can produce.
pub(crate) const fn min_safe_u64(base: u32) -> u64 {
    let mut result: u64 = 1;
    let mut i = 1;
    while i < max_digits_u64(base) {
        result *= base as u64;
        i += 1;
    }
    result
}

/// Overflow direction for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Overflow {
    Positive,
    Negative,
}

impl Overflow {
    pub(crate) fn into_error(self) -> ScanError {
        match self {
            Self::Positive => ScanError::value_positive_overflow("integer overflow"),
            Self::Negative => ScanError::value_negative_overflow("integer overflow"),
        }
    }
}

/// Check an accumulated magnitude against `T`'s range.
///
/// `digit_count` excludes leading zeros and separators.
pub(crate) fn check_overflow<T: ScanInteger>(
    magnitude: u64,
    digit_count: usize,
    base: u32,
    negative: bool,
) -> Result<(), Overflow> {
    let direction = if negative {
        Overflow::Negative
    } else {
        Overflow::Positive
    };
    let max_digits = max_digits_u64(base) as usize;
    if digit_count > max_digits {
        return Err(direction);
    }
    if digit_count == max_digits && magnitude < min_safe_u64(base) {
        // Wrapped around u64.
        return Err(direction);
    }
    let limit = T::MAX_MAGNITUDE + u64::from(negative && T::SIGNED);
    if magnitude > limit {
        return Err(direction);
    }
    Ok(())
}

// ─── SWAR decimal fast path ────────────────────────────────────────

/// Load eight bytes as a little-endian word, if that many are available.
#[inline]
pub(crate) fn eight_byte_word(window: &[u8]) -> Option<u64> {
    let chunk: [u8; 8] = window.get(..8)?.try_into().ok()?;
    Some(u64::from_le_bytes(chunk))
}

/// True when every byte of `word` is an ASCII decimal digit.
#[inline]
pub(crate) fn all_bytes_are_digits(word: u64) -> bool {
    const HI_NIBBLES: u64 = 0xF0F0_F0F0_F0F0_F0F0;
    // High nibbles must all be 3, and adding 6 to each low digit must not
    // carry into the high nibble (rules out 0x3A..0x3F).
    ((word & HI_NIBBLES) | ((word.wrapping_add(0x0606_0606_0606_0606) & HI_NIBBLES) >> 4))
        == 0x3333_3333_3333_3333
}

/// Parse eight ASCII digits in one go.
///
/// # Contract
///
/// Every byte of `word` is an ASCII digit ([`all_bytes_are_digits`]).
#[inline]
pub(crate) fn parse_eight_digits(word: u64) -> u64 {
    const MASK: u64 = 0x0000_00FF_0000_00FF;
    const MUL1: u64 = 0x000F_4240_0000_0064; // 100 + (10^6 << 32)
    const MUL2: u64 = 0x0000_2710_0000_0001; // 1 + (10^4 << 32)
    let val = word.wrapping_sub(0x3030_3030_3030_3030);
    let val = val.wrapping_mul(10).wrapping_add(val >> 8);
    let val = (val & MASK)
        .wrapping_mul(MUL1)
        .wrapping_add(((val >> 16) & MASK).wrapping_mul(MUL2))
        >> 32;
    val & 0xFFFF_FFFF
}

/// Scalar reference for [`parse_eight_digits`], kept for property testing.
#[cfg(test)]
pub(crate) fn scalar_parse_eight_digits(bytes: &[u8; 8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| acc * 10 + u64::from(b - b'0'))
}

// ─── Thousands-separator grouping ──────────────────────────────────

/// Digit run scanned with optional thousands separators.
pub(crate) struct GroupedDigits {
    /// The digit code units, separators stripped.
    pub digits: SmallVec<[u8; 40]>,
    /// Digit-group sizes in source order (most significant first).
    /// Meaningful only when `any_separator` is set.
    pub groups: SmallVec<[usize; 8]>,
    /// True when at least one separator was consumed.
    pub any_separator: bool,
}

/// Scan a run of digits in `base`, consuming `sep` as a thousands separator
/// when given.
///
/// A separator only belongs to the number when another digit follows it
/// directly; otherwise it ends the run and stays unconsumed. May return an
/// empty digit list; the caller decides whether that is an error.
pub(crate) fn scan_grouped_digits(
    buffer: &mut ScanBuffer<'_>,
    base: u32,
    sep: Option<char>,
) -> ScanResult<GroupedDigits> {
    let mut out = GroupedDigits {
        digits: SmallVec::new(),
        groups: SmallVec::new(),
        any_separator: false,
    };
    let mut current_group = 0usize;

    loop {
        match buffer.peek()? {
            Some(b) if crate::readers::digit_in_base(b, base) => {
                out.digits.push(b);
                current_group += 1;
                buffer.advance(1);
            }
            Some(_) => {
                let Some(sep) = sep else { break };
                let decoded = match buffer.peek_char() {
                    Ok(d) => d,
                    // Invalid encoding ends the number; the digits already
                    // read may be complete.
                    Err(e) if e.is_recoverable() => None,
                    Err(e) => return Err(e),
                };
                let Some((cp, len)) = decoded else { break };
                if cp != sep || out.digits.is_empty() {
                    break;
                }
                let next = buffer.lookahead(len + 1)?;
                let followed_by_digit = next
                    .get(len)
                    .is_some_and(|&b| crate::readers::digit_in_base(b, base));
                if !followed_by_digit {
                    break;
                }
                buffer.advance(len);
                out.groups.push(current_group);
                current_group = 0;
                out.any_separator = true;
            }
            None => break,
        }
    }

    if out.any_separator {
        out.groups.push(current_group);
    }
    Ok(out)
}

/// Verify separator-delimited digit group sizes against a locale grouping
/// descriptor.
///
/// `group_sizes` is in source order (most significant group first);
/// `grouping` lists expected sizes least significant first, its last entry
/// repeating. The most significant group may be shorter than expected but
/// never empty; all other groups must match exactly.
pub(crate) fn verify_grouping(group_sizes: &[usize], grouping: &[u8]) -> ScanResult<()> {
    let invalid =
        || ScanError::invalid_scanned_value("invalid thousands separator grouping");

    if grouping.is_empty() {
        // The locale does not group; any separator is a mismatch.
        return if group_sizes.len() <= 1 {
            Ok(())
        } else {
            Err(invalid())
        };
    }
    if group_sizes.iter().any(|&size| size == 0) {
        return Err(invalid());
    }

    let mut expected = grouping
        .iter()
        .chain(std::iter::repeat(grouping.last().unwrap_or(&u8::MAX)));
    for (i, &size) in group_sizes.iter().rev().enumerate() {
        let want = usize::from(*expected.next().unwrap_or(&u8::MAX));
        let is_most_significant = i == group_sizes.len() - 1;
        if size == want {
            continue;
        }
        if is_most_significant && size < want {
            continue;
        }
        return Err(invalid());
    }
    Ok(())
}
