//! Integer reader: sign, base detection, digit accumulation, overflow
//! discipline, and localized thousands-separator grouping.

use intake_core::{unicode, ScanBuffer, ScanError, ScanResult};
use intake_format::{FormatSpecs, Presentation};

use crate::locale::Locale;
use crate::readers::numeric::{
    all_bytes_are_digits, check_overflow, eight_byte_word, parse_eight_digits,
    scan_grouped_digits, verify_grouping, ScanInteger,
};
use crate::readers::{eat_byte, read_sign, Sign};

/// Read an integer at the buffer's current position.
pub(crate) fn read_int<T: ScanInteger>(
    buffer: &mut ScanBuffer<'_>,
    specs: &FormatSpecs<'_>,
    locale: &Locale,
) -> ScanResult<T> {
    let sign = read_sign(buffer)?;
    if specs.presentation == Presentation::IntUnsignedDecimal && sign != Sign::Default {
        return Err(ScanError::invalid_scanned_value(
            "sign not allowed with 'u' type specifier",
        ));
    }
    if sign.is_minus() && !T::SIGNED {
        return Err(ScanError::invalid_scanned_value(
            "unsigned destination rejects '-'",
        ));
    }

    let base = resolve_base(buffer, specs)?;

    let (magnitude, digit_count) = if specs.localized {
        read_digits_localized(buffer, base, locale)?
    } else {
        read_digits(buffer, base)?
    };

    check_overflow::<T>(magnitude, digit_count, base, sign.is_minus())
        .map_err(super::numeric::Overflow::into_error)?;
    Ok(T::from_magnitude(magnitude, sign.is_minus()))
}

/// Resolve the field's base and consume any base prefix.
///
/// Explicit presentations allow their own prefix (`0x` for hex, `0b` for
/// binary, `0o` for octal); generic/default fields detect the base from the
/// prefix, with a bare leading zero selecting octal.
fn resolve_base(buffer: &mut ScanBuffer<'_>, specs: &FormatSpecs<'_>) -> ScanResult<u32> {
    let base = specs.base_or(0);
    match base {
        0 => detect_base(buffer),
        2 => {
            eat_prefix(buffer, b"bB")?;
            Ok(2)
        }
        8 => {
            eat_prefix(buffer, b"oO")?;
            Ok(8)
        }
        16 => {
            eat_prefix(buffer, b"xX")?;
            Ok(16)
        }
        _ => Ok(base),
    }
}

/// Consume `0` + one of `tags` when present.
fn eat_prefix(buffer: &mut ScanBuffer<'_>, tags: &[u8]) -> ScanResult<()> {
    let ahead = buffer.lookahead(2)?;
    if ahead.len() == 2 && ahead[0] == b'0' && tags.contains(&ahead[1]) {
        buffer.advance(2);
    }
    Ok(())
}

/// Detect the base of a default/`i` field from its prefix.
fn detect_base(buffer: &mut ScanBuffer<'_>) -> ScanResult<u32> {
    let ahead = buffer.lookahead(2)?;
    if ahead.first() != Some(&b'0') {
        return Ok(10);
    }
    match ahead.get(1) {
        Some(b'x' | b'X') => {
            buffer.advance(2);
            Ok(16)
        }
        Some(b'b' | b'B') => {
            buffer.advance(2);
            Ok(2)
        }
        Some(b'o' | b'O') => {
            buffer.advance(2);
            Ok(8)
        }
        Some(b'0'..=b'9') => Ok(8),
        _ => Ok(10),
    }
}

/// Accumulate digits in `base`.
///
/// Returns the (possibly wrapped) magnitude and the digit count excluding
/// leading zeros; wrapping is caught by the caller's digit-count overflow
/// check. Rejects input whose first code unit is not a digit.
fn read_digits(buffer: &mut ScanBuffer<'_>, base: u32) -> ScanResult<(u64, usize)> {
    let mut zeros = 0usize;
    while eat_byte(buffer, b'0')? {
        zeros += 1;
    }

    let mut magnitude = 0u64;
    let mut digit_count = 0usize;

    // Contiguous decimal fast path: eight digits per step.
    if base == 10 {
        loop {
            let Some(word) = eight_byte_word(buffer.buffered_window()) else {
                break;
            };
            if !all_bytes_are_digits(word) {
                break;
            }
            magnitude = magnitude
                .wrapping_mul(100_000_000)
                .wrapping_add(parse_eight_digits(word));
            digit_count += 8;
            buffer.advance(8);
        }
    }

    while let Some(b) = buffer.peek()? {
        let digit = unicode::char_to_digit(b);
        if digit >= base {
            break;
        }
        magnitude = magnitude
            .wrapping_mul(u64::from(base))
            .wrapping_add(u64::from(digit));
        digit_count += 1;
        buffer.advance(1);
    }

    if zeros == 0 && digit_count == 0 {
        return Err(super::fail_empty(
            buffer,
            ScanError::invalid_scanned_value("invalid integer value"),
        ));
    }
    Ok((magnitude, digit_count))
}

/// Accumulate digits in `base` with locale thousands separators.
///
/// Separator positions are recorded as digit-group sizes and validated
/// against the locale's grouping descriptor after the scan.
fn read_digits_localized(
    buffer: &mut ScanBuffer<'_>,
    base: u32,
    locale: &Locale,
) -> ScanResult<(u64, usize)> {
    let scanned = scan_grouped_digits(buffer, base, Some(locale.thousands_sep()))?;
    if scanned.digits.is_empty() {
        return Err(super::fail_empty(
            buffer,
            ScanError::invalid_scanned_value("invalid integer value"),
        ));
    }
    if scanned.any_separator {
        verify_grouping(&scanned.groups, locale.grouping())?;
    }

    let mut magnitude = 0u64;
    let mut digit_count = 0usize;
    for &b in scanned.digits.iter().skip_while(|&&b| b == b'0') {
        magnitude = magnitude
            .wrapping_mul(u64::from(base))
            .wrapping_add(u64::from(unicode::char_to_digit(b)));
        digit_count += 1;
    }
    Ok((magnitude, digit_count))
}
