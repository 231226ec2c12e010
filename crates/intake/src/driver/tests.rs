#![allow(clippy::unwrap_used)]

use intake_core::{ErrorCode, ScanBuffer};
use pretty_assertions::assert_eq;

use crate::args::{ScanArgs, Scannable};
use crate::locale::Locale;

use super::run;

fn scan_i32_pair(source: &str, format: &str) -> Result<(i32, i32, usize), ErrorCode> {
    let mut a = 0i32;
    let mut b = 0i32;
    let mut buf = ScanBuffer::from_str(source);
    let mut args = ScanArgs::new(vec![a.as_scan_arg(), b.as_scan_arg()]);
    let pos = run(&mut buf, format, &mut args, &Locale::classic()).map_err(|e| e.code())?;
    drop(args);
    Ok((a, b, pos))
}

// === Literals and whitespace ===

#[test]
fn literal_matching() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("x=42");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let pos = run(&mut buf, "x={}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!((n, pos), (42, 4));
}

#[test]
fn literal_mismatch_positions_at_divergence() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("xy42");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let err = run(&mut buf, "xz{}", &mut args, &Locale::classic()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidLiteral);
    // 'x' matched, divergence at 'y'.
    assert_eq!(buf.position(), 1);
}

#[test]
fn literal_hits_end_of_input() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("x");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let err = run(&mut buf, "xy{}", &mut args, &Locale::classic()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::EndOfInput);
}

#[test]
fn format_whitespace_matches_any_run() {
    assert_eq!(scan_i32_pair("1     2", "{} {}"), Ok((1, 2, 7)));
    assert_eq!(scan_i32_pair("1\t\n2", "{} {}"), Ok((1, 2, 4)));
}

#[test]
fn format_whitespace_matches_empty_run() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("7");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let pos = run(&mut buf, " {} ", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!((n, pos), (7, 1));
}

#[test]
fn doubled_braces_match_literal_braces() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("{42}");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let pos = run(&mut buf, "{{{}}}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!((n, pos), (42, 4));
}

// === Field dispatch and whitespace skipping ===

#[test]
fn fields_skip_leading_whitespace() {
    assert_eq!(scan_i32_pair("  1   2", "{}{}"), Ok((1, 2, 7)));
}

#[test]
fn char_fields_do_not_skip_whitespace() {
    let mut c = 'x';
    let mut buf = ScanBuffer::from_str(" a");
    let mut args = ScanArgs::new(vec![c.as_scan_arg()]);
    run(&mut buf, "{}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!(c, ' ');
}

#[test]
fn scanset_fields_do_not_skip_whitespace() {
    let mut s = String::new();
    let mut buf = ScanBuffer::from_str(" ab");
    let mut args = ScanArgs::new(vec![s.as_scan_arg()]);
    let err = run(&mut buf, "{:[a-z]}", &mut args, &Locale::classic()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidScannedValue);
}

// === Error discipline ===

#[test]
fn failing_field_rewinds_to_field_start() {
    let mut a = 0i32;
    let mut b = 0i32;
    let mut buf = ScanBuffer::from_str("1 x");
    let mut args = ScanArgs::new(vec![a.as_scan_arg(), b.as_scan_arg()]);
    let err = run(&mut buf, "{} {}", &mut args, &Locale::classic()).unwrap_err();
    drop(args);
    assert_eq!(err.code(), ErrorCode::InvalidScannedValue);
    // Position is back before the failing field (after "1 ").
    assert_eq!(buf.position(), 2);
    // The first destination keeps its value.
    assert_eq!(a, 1);
    assert_eq!(b, 0);
}

#[test]
fn overflow_rewinds_whole_field() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("9999999999999999999");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let err = run(&mut buf, "{}", &mut args, &Locale::classic()).unwrap_err();
    drop(args);
    assert_eq!(err.code(), ErrorCode::ValuePositiveOverflow);
    assert_eq!(buf.position(), 0);
    assert_eq!(n, 0);
}

// === Argument bookkeeping ===

#[test]
fn out_of_range_argument_id() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("1 2");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let err = run(&mut buf, "{0} {1}", &mut args, &Locale::classic()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidFormatString);
}

#[test]
fn duplicate_argument_id() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("1 2");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let err = run(&mut buf, "{0} {0}", &mut args, &Locale::classic()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidFormatString);
}

#[test]
fn unconsumed_argument_is_an_error() {
    let mut a = 0i32;
    let mut b = 0i32;
    let mut buf = ScanBuffer::from_str("1");
    let mut args = ScanArgs::new(vec![a.as_scan_arg(), b.as_scan_arg()]);
    let err = run(&mut buf, "{}", &mut args, &Locale::classic()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidFormatString);
    assert_eq!(err.msg(), Some("argument list not exhausted"));
}

#[test]
fn explicit_ids_consume_out_of_order() {
    let mut a = 0i32;
    let mut b = 0i32;
    let mut buf = ScanBuffer::from_str("10 20");
    let mut args = ScanArgs::new(vec![a.as_scan_arg(), b.as_scan_arg()]);
    run(&mut buf, "{1} {0}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!((a, b), (20, 10));
}

#[test]
fn spec_invalid_for_argument_kind() {
    let mut s = String::new();
    let mut buf = ScanBuffer::from_str("abc");
    let mut args = ScanArgs::new(vec![s.as_scan_arg()]);
    let err = run(&mut buf, "{:d}", &mut args, &Locale::classic()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidFormatString);
}

// === Fill and alignment ===

#[test]
fn right_align_skips_leading_fill() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("***42");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let pos = run(&mut buf, "{:*>5}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!((n, pos), (42, 5));
}

#[test]
fn left_align_skips_trailing_fill() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("42***x");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let pos = run(&mut buf, "{:*<5}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!((n, pos), (42, 5));
}

#[test]
fn center_align_skips_both_sides() {
    let mut n = 0i32;
    let mut buf = ScanBuffer::from_str("--7--");
    let mut args = ScanArgs::new(vec![n.as_scan_arg()]);
    let pos = run(&mut buf, "{:-^5}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!((n, pos), (7, 5));
}

// === Regex fields ===

#[test]
fn regex_field_is_rejected_at_scan_time() {
    let mut s = String::new();
    let mut buf = ScanBuffer::from_str("abc");
    let mut args = ScanArgs::new(vec![s.as_scan_arg()]);
    let err = run(&mut buf, "{:/[a-z]+/}", &mut args, &Locale::classic()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidFormatString);
    assert_eq!(err.msg(), Some("regex support disabled"));
}

// === Pointers ===

#[test]
fn pointer_reads_hex() {
    let mut p: *const () = std::ptr::null();
    let mut buf = ScanBuffer::from_str("0x1f00");
    let mut args = ScanArgs::new(vec![p.as_scan_arg()]);
    run(&mut buf, "{:p}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!(p as usize, 0x1f00);
}

#[test]
fn pointer_defaults_to_hex_without_presentation() {
    let mut p: *const () = std::ptr::null();
    let mut buf = ScanBuffer::from_str("ff");
    let mut args = ScanArgs::new(vec![p.as_scan_arg()]);
    run(&mut buf, "{}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!(p as usize, 0xff);
}

// === Custom scanners ===

struct Doubler(i64);

impl crate::args::CustomScan for Doubler {
    fn scan(
        &mut self,
        buffer: &mut ScanBuffer<'_>,
        specs: &intake_format::FormatSpecs<'_>,
        locale: &Locale,
    ) -> intake_core::ScanResult<()> {
        let value: i64 = crate::readers::int::read_int(buffer, specs, locale)?;
        self.0 = value * 2;
        Ok(())
    }
}

#[test]
fn custom_scanner_is_dispatched() {
    let mut doubler = Doubler(0);
    let mut buf = ScanBuffer::from_str("21");
    let mut args = ScanArgs::new(vec![crate::args::ScanArg::Custom(&mut doubler)]);
    run(&mut buf, "{}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!(doubler.0, 42);
}

// === Bytes ===

#[test]
fn byte_buffer_field() {
    let mut chunk = [0u8; 3];
    let mut buf = ScanBuffer::from_str("abcdef");
    let mut args = ScanArgs::new(vec![chunk[..].as_scan_arg()]);
    let pos = run(&mut buf, "{}", &mut args, &Locale::classic()).unwrap();
    drop(args);
    assert_eq!(&chunk, b"abc");
    assert_eq!(pos, 3);
}
