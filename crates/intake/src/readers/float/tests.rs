#![allow(clippy::unwrap_used)]

use intake_core::{ErrorCode, ScanBuffer};
use intake_format::{FormatEvent, FormatParser, FormatSpecs};
use proptest::prelude::*;

use crate::locale::Locale;

use super::{read_float, ScanFloat};

fn specs_of(fmt: &str) -> FormatSpecs<'_> {
    let mut parser = FormatParser::new(fmt);
    match parser.next_event().unwrap() {
        Some(FormatEvent::Field { specs, .. }) => specs,
        other => panic!("expected field, got {other:?}"),
    }
}

fn read<T: ScanFloat>(source: &str, fmt: &str) -> Result<(T, usize), ErrorCode> {
    let mut buf = ScanBuffer::from_str(source);
    read_float::<T>(&mut buf, &specs_of(fmt), &Locale::classic())
        .map(|v| (v, buf.position()))
        .map_err(|e| e.code())
}

fn read_localized<T: ScanFloat>(
    source: &str,
    fmt: &str,
    locale: &Locale,
) -> Result<(T, usize), ErrorCode> {
    let mut buf = ScanBuffer::from_str(source);
    read_float::<T>(&mut buf, &specs_of(fmt), locale)
        .map(|v| (v, buf.position()))
        .map_err(|e| e.code())
}

// === Finite decimal forms ===

#[test]
fn plain_values() {
    assert_eq!(read::<f64>("3.14", "{}"), Ok((3.14, 4)));
    assert_eq!(read::<f64>("42", "{}"), Ok((42.0, 2)));
    assert_eq!(read::<f64>("0", "{}"), Ok((0.0, 1)));
    assert_eq!(read::<f64>("-2.5", "{}"), Ok((-2.5, 4)));
    assert_eq!(read::<f64>("+2.5", "{}"), Ok((2.5, 4)));
}

#[test]
fn fraction_only_and_trailing_point() {
    assert_eq!(read::<f64>(".5", "{}"), Ok((0.5, 2)));
    assert_eq!(read::<f64>("1.", "{}"), Ok((1.0, 2)));
}

#[test]
fn scientific_forms() {
    assert_eq!(read::<f64>("1.5e10", "{}"), Ok((1.5e10, 6)));
    assert_eq!(read::<f64>("1e-3", "{}"), Ok((1e-3, 4)));
    assert_eq!(read::<f64>("2E+4", "{}"), Ok((2e4, 4)));
}

#[test]
fn dangling_exponent_marker_is_rolled_back() {
    // "1.5e" with no digits: the 'e' is not part of the number.
    assert_eq!(read::<f64>("1.5eggs", "{}"), Ok((1.5, 3)));
    assert_eq!(read::<f64>("2e+x", "{}"), Ok((2.0, 1)));
}

#[test]
fn value_stops_at_non_numeric() {
    assert_eq!(read::<f64>("3.14 rest", "{}"), Ok((3.14, 4)));
    assert_eq!(read::<f64>("7,5", "{}"), Ok((7.0, 1)));
}

#[test]
fn no_digits_is_invalid() {
    assert_eq!(read::<f64>("x", "{}"), Err(ErrorCode::InvalidScannedValue));
    assert_eq!(read::<f64>(".x", "{}"), Err(ErrorCode::InvalidScannedValue));
    // Exhaustion mid-read is end-of-input, not a value error.
    assert_eq!(read::<f64>(".", "{}"), Err(ErrorCode::EndOfInput));
    assert_eq!(read::<f64>("", "{}"), Err(ErrorCode::EndOfInput));
}

// === Infinities and NaN ===

#[test]
fn infinities() {
    let (v, pos) = read::<f64>("inf", "{}").unwrap();
    assert_eq!(v, f64::INFINITY);
    assert_eq!(pos, 3);

    let (v, pos) = read::<f64>("INFINITY", "{}").unwrap();
    assert_eq!(v, f64::INFINITY);
    assert_eq!(pos, 8);

    let (v, _) = read::<f64>("-inf", "{}").unwrap();
    assert_eq!(v, f64::NEG_INFINITY);
}

#[test]
fn inf_prefix_of_other_word() {
    // "infix": only "inf" belongs to the value.
    assert_eq!(read::<f64>("infix", "{}").unwrap().1, 3);
}

#[test]
fn nan_forms() {
    let (v, pos) = read::<f64>("nan", "{}").unwrap();
    assert!(v.is_nan());
    assert_eq!(pos, 3);

    let (v, pos) = read::<f64>("NaN(0x123_abc)", "{}").unwrap();
    assert!(v.is_nan());
    assert_eq!(pos, 14);

    let (v, _) = read::<f64>("-nan", "{}").unwrap();
    assert!(v.is_nan());
    assert!(v.is_sign_negative());
}

#[test]
fn unterminated_nan_payload_is_invalid() {
    assert_eq!(
        read::<f64>("nan(abc", "{}"),
        Err(ErrorCode::InvalidScannedValue)
    );
    assert_eq!(
        read::<f64>("nan(a-c)", "{}"),
        Err(ErrorCode::InvalidScannedValue)
    );
}

// === Hexfloats ===

#[test]
fn hexfloat_with_prefix_in_default_mode() {
    assert_eq!(read::<f64>("0x1.8p1", "{}"), Ok((3.0, 7)));
    assert_eq!(read::<f64>("0x10", "{}"), Ok((16.0, 4)));
    assert_eq!(read::<f64>("0x1p-2", "{}"), Ok((0.25, 6)));
}

#[test]
fn hexfloat_presentation_without_prefix() {
    assert_eq!(read::<f64>("1.8p1", "{:a}"), Ok((3.0, 5)));
    assert_eq!(read::<f64>("ff", "{:a}"), Ok((255.0, 2)));
    assert_eq!(read::<f64>("0x1.8p1", "{:a}"), Ok((3.0, 7)));
}

#[test]
fn hexfloat_fraction_scaling() {
    assert_eq!(read::<f64>("0x0.8", "{}"), Ok((0.5, 5)));
    assert_eq!(read::<f64>("0x0.001", "{}"), Ok((2f64.powi(-12), 7)));
    assert_eq!(read::<f64>("0x1.fp+3", "{}"), Ok((15.5, 8)));
}

#[test]
fn hexfloat_subnormal_and_extremes() {
    assert_eq!(read::<f64>("0x1p-1074", "{}"), Ok((f64::from_bits(1), 9)));
    assert_eq!(read::<f64>("0x1p-1075", "{}"), Ok((0.0, 9)));
    let (max, _) = read::<f64>("0x1.fffffffffffffp+1023", "{}").unwrap();
    assert_eq!(max, f64::MAX);
}

#[test]
fn hexfloat_overflow() {
    assert_eq!(
        read::<f64>("0x1p1024", "{}"),
        Err(ErrorCode::ValuePositiveOverflow)
    );
    assert_eq!(
        read::<f64>("-0x1p99999", "{}"),
        Err(ErrorCode::ValueNegativeOverflow)
    );
}

#[test]
fn hexfloat_dangling_exponent_rolls_back() {
    assert_eq!(read::<f64>("0x1.8px", "{}"), Ok((1.5, 5)));
}

#[test]
fn hexfloat_without_digits_is_invalid() {
    assert_eq!(
        read::<f64>("0x.p3", "{}"),
        Err(ErrorCode::InvalidScannedValue)
    );
}

// === Presentation restrictions ===

#[test]
fn fixed_rejects_exponent_and_hex() {
    assert_eq!(read::<f64>("1.5e10", "{:f}"), Ok((1.5, 3)));
    // "0x10" under {:f}: the integer part is "0", then "x" stops the scan.
    assert_eq!(read::<f64>("0x10", "{:f}"), Ok((0.0, 1)));
}

#[test]
fn scientific_requires_exponent() {
    assert_eq!(read::<f64>("1.5e3", "{:e}"), Ok((1500.0, 5)));
    assert_eq!(
        read::<f64>("1.5", "{:e}"),
        Err(ErrorCode::InvalidScannedValue)
    );
}

#[test]
fn general_accepts_both() {
    assert_eq!(read::<f64>("1.5", "{:g}"), Ok((1.5, 3)));
    assert_eq!(read::<f64>("1.5e3", "{:g}"), Ok((1500.0, 5)));
}

// === Overflow / underflow ===

#[test]
fn decimal_overflow() {
    assert_eq!(
        read::<f64>("1e400", "{}"),
        Err(ErrorCode::ValuePositiveOverflow)
    );
    assert_eq!(
        read::<f64>("-1e400", "{}"),
        Err(ErrorCode::ValueNegativeOverflow)
    );
}

#[test]
fn underflow_to_zero_is_not_an_error() {
    assert_eq!(read::<f64>("1e-400", "{}"), Ok((0.0, 6)));
}

#[test]
fn subnormals_are_accepted() {
    let (v, _) = read::<f64>("5e-324", "{}").unwrap();
    assert_eq!(v, f64::from_bits(1));
}

#[test]
fn f32_narrowing_overflow() {
    assert_eq!(read::<f32>("3.5", "{}"), Ok((3.5f32, 3)));
    assert_eq!(
        read::<f32>("1e39", "{}"),
        Err(ErrorCode::ValuePositiveOverflow)
    );
    assert_eq!(
        read::<f32>("0x1p128", "{}"),
        Err(ErrorCode::ValuePositiveOverflow)
    );
    assert_eq!(read::<f32>("0x1p127", "{}").unwrap().0, 2f32.powi(127));
}

// === Localized ===

#[test]
fn localized_decimal_point() {
    let loc = Locale::classic()
        .with_decimal_point(',')
        .with_thousands_sep('.');
    assert_eq!(read_localized::<f64>("3,14", "{:L}", &loc), Ok((3.14, 4)));
    // Unlocalized field keeps '.' even under a comma-decimal locale.
    assert_eq!(read_localized::<f64>("3.14", "{}", &loc), Ok((3.14, 4)));
}

#[test]
fn localized_grouping_in_integer_part() {
    let loc = Locale::classic();
    assert_eq!(
        read_localized::<f64>("1,234.5", "{:L}", &loc),
        Ok((1234.5, 7))
    );
    assert_eq!(
        read_localized::<f64>("12,34.5", "{:L}", &loc),
        Err(ErrorCode::InvalidScannedValue)
    );
}

// === Round-trip ===

proptest! {
    #[test]
    fn format_then_scan_round_trips(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        prop_assume!(value.is_finite());
        let text = format!("{value:?}");
        let (scanned, consumed) = read::<f64>(&text, "{}").unwrap();
        prop_assert_eq!(scanned.to_bits(), value.to_bits());
        prop_assert_eq!(consumed, text.len());
    }
}
