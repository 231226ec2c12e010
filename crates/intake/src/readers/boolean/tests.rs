#![allow(clippy::unwrap_used)]

use intake_core::{ErrorCode, ScanBuffer};
use intake_format::{FormatEvent, FormatParser, FormatSpecs};

use crate::locale::Locale;

use super::{read_bool, BoolOptions};

fn specs_of(fmt: &str) -> FormatSpecs<'_> {
    let mut parser = FormatParser::new(fmt);
    match parser.next_event().unwrap() {
        Some(FormatEvent::Field { specs, .. }) => specs,
        other => panic!("expected field, got {other:?}"),
    }
}

fn read(source: &str, fmt: &str) -> Result<(bool, usize), ErrorCode> {
    read_with(source, fmt, &Locale::classic())
}

fn read_with(source: &str, fmt: &str, locale: &Locale) -> Result<(bool, usize), ErrorCode> {
    let mut buf = ScanBuffer::from_str(source);
    read_bool(&mut buf, &specs_of(fmt), locale)
        .map(|v| (v, buf.position()))
        .map_err(|e| e.code())
}

#[test]
fn textual_forms() {
    assert_eq!(read("true", "{}"), Ok((true, 4)));
    assert_eq!(read("false", "{}"), Ok((false, 5)));
}

#[test]
fn numeric_forms() {
    assert_eq!(read("1", "{}"), Ok((true, 1)));
    assert_eq!(read("0", "{}"), Ok((false, 1)));
}

#[test]
fn numeric_tried_first() {
    // "1rue" reads as numeric true, leaving "rue".
    assert_eq!(read("1rue", "{}"), Ok((true, 1)));
}

#[test]
fn case_sensitive_text() {
    assert_eq!(read("True", "{}"), Err(ErrorCode::InvalidScannedValue));
    assert_eq!(read("FALSE", "{}"), Err(ErrorCode::InvalidScannedValue));
}

#[test]
fn no_match_is_invalid() {
    assert_eq!(read("yes", "{}"), Err(ErrorCode::InvalidScannedValue));
    assert_eq!(read("2", "{}"), Err(ErrorCode::InvalidScannedValue));
    // Exhaustion is end-of-input, not a value error.
    assert_eq!(read("", "{}"), Err(ErrorCode::EndOfInput));
}

#[test]
fn string_presentation_is_text_only() {
    assert_eq!(read("true", "{:s}"), Ok((true, 4)));
    assert_eq!(read("1", "{:s}"), Err(ErrorCode::InvalidScannedValue));
}

#[test]
fn numeric_presentation_is_numeric_only() {
    assert_eq!(read("1", "{:d}"), Ok((true, 1)));
    assert_eq!(read("true", "{:d}"), Err(ErrorCode::InvalidScannedValue));
    assert_eq!(read("0", "{:i}"), Ok((false, 1)));
}

#[test]
fn localized_uses_locale_names() {
    let loc = Locale::classic().with_names("ja", "nein");
    assert_eq!(read_with("ja", "{:L}", &loc), Ok((true, 2)));
    assert_eq!(read_with("nein", "{:L}", &loc), Ok((false, 4)));
    assert_eq!(read_with("true", "{:L}", &loc), Err(ErrorCode::InvalidScannedValue));
}

#[test]
fn localized_keeps_numeric_enabled() {
    let loc = Locale::classic().with_names("ja", "nein");
    assert_eq!(read_with("1", "{:L}", &loc), Ok((true, 1)));
}

#[test]
fn prefix_match_consumes_only_the_name() {
    assert_eq!(read("truest", "{}"), Ok((true, 4)));
}

#[test]
fn options_derivation() {
    let opts = BoolOptions::from_specs(&specs_of("{}"));
    assert!(opts.allow_text && opts.allow_numeric && !opts.use_locale_names);

    let opts = BoolOptions::from_specs(&specs_of("{:s}"));
    assert!(opts.allow_text && !opts.allow_numeric);

    let opts = BoolOptions::from_specs(&specs_of("{:x}"));
    assert!(!opts.allow_text && opts.allow_numeric);

    let opts = BoolOptions::from_specs(&specs_of("{:Ls}"));
    assert!(opts.allow_text && opts.use_locale_names);
}