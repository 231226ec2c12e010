//! Float reader: classification (inf/nan/finite), decimal and hex-float
//! forms, exponent handling, locale-aware decimal point and grouping, and
//! overflow policy.
//!
//! Finite decimal forms are normalized into a small buffer (separators
//! stripped, locale decimal point replaced by `.`) and converted with the
//! standard library's correctly rounded parser. Hex-floats are converted by
//! exact mantissa accumulation and power-of-two scaling.

use intake_core::{ScanBuffer, ScanError, ScanResult};
use intake_format::{FormatSpecs, Presentation};
use smallvec::SmallVec;

use crate::locale::Locale;
use crate::readers::numeric::{scan_grouped_digits, verify_grouping};
use crate::readers::{eat_ascii_nocase, eat_byte, eat_char, read_sign, Sign};

/// Destination float types the scanner can produce.
pub(crate) trait ScanFloat: Copy {
    /// Parse a normalized finite form (`digits[.digits][e±digits]`).
    fn parse_finite(text: &str) -> Option<Self>;
    /// Positive infinity.
    fn infinity() -> Self;
    /// Quiet NaN.
    fn nan() -> Self;
    /// Negate.
    fn negate(self) -> Self;
    /// True for an infinite value.
    fn is_infinite_value(self) -> bool;
    /// Narrow from an `f64`, `None` when the finite value does not fit.
    fn from_f64_checked(value: f64) -> Option<Self>;
}

impl ScanFloat for f64 {
    fn parse_finite(text: &str) -> Option<Self> {
        text.parse().ok()
    }
    fn infinity() -> Self {
        f64::INFINITY
    }
    fn nan() -> Self {
        f64::NAN
    }
    fn negate(self) -> Self {
        -self
    }
    fn is_infinite_value(self) -> bool {
        self.is_infinite()
    }
    fn from_f64_checked(value: f64) -> Option<Self> {
        Some(value)
    }
}

impl ScanFloat for f32 {
    fn parse_finite(text: &str) -> Option<Self> {
        text.parse().ok()
    }
    fn infinity() -> Self {
        f32::INFINITY
    }
    fn nan() -> Self {
        f32::NAN
    }
    fn negate(self) -> Self {
        -self
    }
    fn is_infinite_value(self) -> bool {
        self.is_infinite()
    }
    #[allow(clippy::cast_possible_truncation, reason = "rounding cast is the point")]
    fn from_f64_checked(value: f64) -> Option<Self> {
        let narrowed = value as f32;
        if narrowed.is_infinite() && value.is_finite() {
            return None;
        }
        Some(narrowed)
    }
}

/// Which finite forms the field's presentation admits.
struct Options {
    allow_hex: bool,
    allow_scientific: bool,
    allow_fixed: bool,
}

impl Options {
    fn from_presentation(presentation: Presentation) -> Self {
        match presentation {
            Presentation::FloatHex => Self {
                allow_hex: true,
                allow_scientific: false,
                allow_fixed: false,
            },
            Presentation::FloatScientific => Self {
                allow_hex: false,
                allow_scientific: true,
                allow_fixed: false,
            },
            Presentation::FloatFixed => Self {
                allow_hex: false,
                allow_scientific: false,
                allow_fixed: true,
            },
            _ => Self {
                allow_hex: true,
                allow_scientific: true,
                allow_fixed: true,
            },
        }
    }
}

/// Read a float at the buffer's current position.
pub(crate) fn read_float<T: ScanFloat>(
    buffer: &mut ScanBuffer<'_>,
    specs: &FormatSpecs<'_>,
    locale: &Locale,
) -> ScanResult<T> {
    let sign = read_sign(buffer)?;
    let apply = |value: T| {
        if sign.is_minus() {
            value.negate()
        } else {
            value
        }
    };

    if eat_ascii_nocase(buffer, "inf")? {
        let _ = eat_ascii_nocase(buffer, "inity")?;
        return Ok(apply(T::infinity()));
    }
    if eat_ascii_nocase(buffer, "nan")? {
        read_nan_payload(buffer)?;
        return Ok(apply(T::nan()));
    }

    let options = Options::from_presentation(specs.presentation);
    let value: T = if options.allow_hex {
        let has_prefix = eat_ascii_nocase(buffer, "0x")?;
        if has_prefix || (!options.allow_fixed && !options.allow_scientific) {
            read_hexfloat(buffer, sign)?
        } else {
            read_decimal(buffer, &options, specs.localized, locale, sign)?
        }
    } else {
        read_decimal(buffer, &options, specs.localized, locale, sign)?
    };

    Ok(apply(value))
}

/// Consume an optional `(payload)` after `nan`.
fn read_nan_payload(buffer: &mut ScanBuffer<'_>) -> ScanResult<()> {
    if !eat_byte(buffer, b'(')? {
        return Ok(());
    }
    while let Some(b) = buffer.peek()? {
        if b.is_ascii_alphanumeric() || b == b'_' {
            buffer.advance(1);
        } else {
            break;
        }
    }
    if !eat_byte(buffer, b')')? {
        return Err(ScanError::invalid_scanned_value("invalid NaN payload"));
    }
    Ok(())
}

/// Overflow error with the direction the sign implies.
fn overflow_error(sign: Sign) -> ScanError {
    if sign.is_minus() {
        ScanError::value_negative_overflow("float value out of range")
    } else {
        ScanError::value_positive_overflow("float value out of range")
    }
}

/// Scan and convert a finite decimal form.
fn read_decimal<T: ScanFloat>(
    buffer: &mut ScanBuffer<'_>,
    options: &Options,
    localized: bool,
    locale: &Locale,
    sign: Sign,
) -> ScanResult<T> {
    let decimal_point = if localized { locale.decimal_point() } else { '.' };
    // A separator colliding with the decimal point loses to it.
    let separator = localized
        .then(|| locale.thousands_sep())
        .filter(|&sep| sep != decimal_point);

    // Integer part, possibly grouped.
    let int_part = scan_grouped_digits(buffer, 10, separator)?;
    if int_part.any_separator {
        verify_grouping(&int_part.groups, locale.grouping())?;
    }

    let mut text: SmallVec<[u8; 64]> = SmallVec::new();
    text.extend_from_slice(&int_part.digits);

    // Fractional part.
    let mut frac_digits = 0usize;
    if eat_char(buffer, decimal_point)? {
        text.push(b'.');
        while let Some(b @ b'0'..=b'9') = buffer.peek()? {
            text.push(b);
            frac_digits += 1;
            buffer.advance(1);
        }
    }

    if int_part.digits.is_empty() && frac_digits == 0 {
        return Err(crate::readers::fail_empty(
            buffer,
            ScanError::invalid_scanned_value("no significand digits in float"),
        ));
    }

    // Exponent; rolled back entirely when no digits follow the marker.
    let mut has_exponent = false;
    if options.allow_scientific {
        let exp_start = buffer.position();
        if matches!(buffer.peek()?, Some(b'e' | b'E')) {
            buffer.advance(1);
            let mut exp: SmallVec<[u8; 8]> = SmallVec::new();
            match buffer.peek()? {
                Some(s @ (b'+' | b'-')) => {
                    exp.push(s);
                    buffer.advance(1);
                }
                _ => {}
            }
            let mut exp_digits = 0usize;
            while let Some(b @ b'0'..=b'9') = buffer.peek()? {
                exp.push(b);
                exp_digits += 1;
                buffer.advance(1);
            }
            if exp_digits == 0 {
                buffer.rewind(exp_start);
            } else {
                text.push(b'e');
                text.extend_from_slice(&exp);
                has_exponent = true;
            }
        }
    }
    if options.allow_scientific && !options.allow_fixed && !has_exponent {
        return Err(ScanError::invalid_scanned_value(
            "no exponent given to scientific float",
        ));
    }

    let normalized = std::str::from_utf8(&text)
        .map_err(|_| ScanError::invalid_scanned_value("invalid float"))?;
    let value = T::parse_finite(normalized)
        .ok_or_else(|| ScanError::invalid_scanned_value("invalid float"))?;
    if value.is_infinite_value() {
        return Err(overflow_error(sign));
    }
    Ok(value)
}

/// Scan and convert a hex-float (`hexdigits[.hexdigits][p±digits]`), the
/// `0x` prefix already consumed when present.
fn read_hexfloat<T: ScanFloat>(buffer: &mut ScanBuffer<'_>, sign: Sign) -> ScanResult<T> {
    // 112 mantissa bits is comfortably beyond f64's 53-plus-guard needs.
    const MANT_HEX_DIGITS: u32 = 28;

    let mut mantissa: u128 = 0;
    let mut mant_digits: u32 = 0;
    let mut exponent_adjust: i64 = 0;
    let mut total_digits = 0usize;

    while let Some(b) = buffer.peek()? {
        let digit = intake_core::unicode::char_to_digit(b);
        if digit >= 16 {
            break;
        }
        if mant_digits < MANT_HEX_DIGITS {
            mantissa = (mantissa << 4) | u128::from(digit);
            if mantissa != 0 {
                mant_digits += 1;
            }
        } else {
            // Digits beyond precision only shift the magnitude; fold any
            // dropped set bit into the sticky position.
            exponent_adjust += 4;
            if digit != 0 {
                mantissa |= 1;
            }
        }
        total_digits += 1;
        buffer.advance(1);
    }

    if eat_byte(buffer, b'.')? {
        while let Some(b) = buffer.peek()? {
            let digit = intake_core::unicode::char_to_digit(b);
            if digit >= 16 {
                break;
            }
            if mant_digits < MANT_HEX_DIGITS {
                mantissa = (mantissa << 4) | u128::from(digit);
                // Every accumulated fraction digit scales by 16, zero or not.
                exponent_adjust -= 4;
                if mantissa != 0 {
                    mant_digits += 1;
                }
            } else if digit != 0 {
                mantissa |= 1;
            }
            total_digits += 1;
            buffer.advance(1);
        }
    }

    if total_digits == 0 {
        return Err(crate::readers::fail_empty(
            buffer,
            ScanError::invalid_scanned_value("no significand digits in hexfloat"),
        ));
    }

    // Binary exponent; rolled back entirely when no digits follow.
    let mut exponent: i64 = 0;
    let exp_start = buffer.position();
    if matches!(buffer.peek()?, Some(b'p' | b'P')) {
        buffer.advance(1);
        let negative = match buffer.peek()? {
            Some(b'-') => {
                buffer.advance(1);
                true
            }
            Some(b'+') => {
                buffer.advance(1);
                false
            }
            _ => false,
        };
        let mut exp_digits = 0usize;
        while let Some(b @ b'0'..=b'9') = buffer.peek()? {
            exponent = exponent
                .saturating_mul(10)
                .saturating_add(i64::from(b - b'0'));
            exp_digits += 1;
            buffer.advance(1);
        }
        if exp_digits == 0 {
            exponent = 0;
            buffer.rewind(exp_start);
        } else if negative {
            exponent = -exponent;
        }
    }

    let value = assemble_hexfloat(mantissa, exponent.saturating_add(exponent_adjust));
    if value.is_infinite() {
        return Err(overflow_error(sign));
    }
    T::from_f64_checked(value).ok_or_else(|| overflow_error(sign))
}

/// `mantissa * 2^exponent` with the scaling split in two so the
/// intermediate neither overflows nor flushes to zero prematurely.
#[allow(clippy::cast_precision_loss, reason = "the rounding conversion is the algorithm")]
fn assemble_hexfloat(mantissa: u128, exponent: i64) -> f64 {
    let mantissa = mantissa as f64;
    if mantissa == 0.0 {
        return 0.0;
    }
    let exponent = i32::try_from(exponent.clamp(-4400, 4400)).unwrap_or(0);
    let half = exponent / 2;
    mantissa * 2f64.powi(half) * 2f64.powi(exponent - half)
}

#[cfg(test)]
mod tests;
