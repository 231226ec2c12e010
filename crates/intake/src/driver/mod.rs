//! Scan driver: walks format events, matches literals and whitespace,
//! dispatches replacement fields to the typed readers, and tracks which
//! arguments have been consumed.
//!
//! Error discipline: the first failure wins. Field failures rewind the
//! buffer to the field's start; literal mismatches leave the position at
//! the point of divergence. Successful events commit their end position,
//! which is what the buffer reports after the scan.

use intake_core::width::WidthAlgorithm;
use intake_core::{ScanBuffer, ScanError, ScanResult};
use intake_format::{validate, Align, FormatEvent, FormatParser, FormatSpecs, Presentation};
use tracing::{debug, trace};

use crate::args::{ScanArg, ScanArgs};
use crate::locale::Locale;
use crate::readers::boolean::read_bool;
use crate::readers::character::{read_byte_span, read_char};
use crate::readers::float::read_float;
use crate::readers::int::read_int;
use crate::readers::string::{read_scanset, read_width_bounded, read_word, StringSink};
use crate::readers::{eat_char, skip_whitespace};

/// Drive one scan: parse `format`, consume from `buffer`, fill `args`.
///
/// Returns the final position (code units consumed since the start of the
/// source). Destinations visited before a failure keep their values; the
/// buffer is left at the failing field's start for retries.
pub(crate) fn run<'s>(
    buffer: &mut ScanBuffer<'s>,
    format: &str,
    args: &mut ScanArgs<'_, 's>,
    locale: &Locale,
) -> ScanResult<usize> {
    let mut parser = FormatParser::new(format);
    let mut visited = VisitedArgs::new(args.len());
    debug!(format, args = args.len(), "scan start");

    while let Some(event) = parser.next_event()? {
        match event {
            FormatEvent::Whitespace(_) => {
                skip_whitespace(buffer)?;
                buffer.commit(buffer.position());
            }
            FormatEvent::Literal(text) => {
                match_literal(buffer, text)?;
                buffer.commit(buffer.position());
            }
            FormatEvent::Field { arg_id, specs } => {
                let field_start = buffer.position();
                trace!(arg_id, position = field_start, "field");
                match scan_field(buffer, arg_id, &specs, args, &mut visited, locale) {
                    Ok(()) => buffer.commit(buffer.position()),
                    Err(e) => {
                        buffer.rewind(field_start);
                        return Err(e);
                    }
                }
            }
        }
    }

    visited.check_exhausted()?;
    debug!(position = buffer.position(), "scan complete");
    Ok(buffer.position())
}

/// Match literal text byte-for-byte.
///
/// On mismatch the position stays at the point of divergence.
fn match_literal(buffer: &mut ScanBuffer<'_>, text: &str) -> ScanResult<()> {
    for expected in text.bytes() {
        match buffer.peek()? {
            Some(b) if b == expected => buffer.advance(1),
            Some(_) => {
                return Err(ScanError::invalid_literal(
                    "format literal does not match input",
                ))
            }
            None => {
                return Err(ScanError::end_of_input(
                    "input ended while matching a format literal",
                ))
            }
        }
    }
    Ok(())
}

/// Scan one replacement field into its argument.
fn scan_field<'s>(
    buffer: &mut ScanBuffer<'s>,
    arg_id: usize,
    specs: &FormatSpecs<'_>,
    args: &mut ScanArgs<'_, 's>,
    visited: &mut VisitedArgs,
    locale: &Locale,
) -> ScanResult<()> {
    visited.visit(arg_id)?;
    let arg = args
        .get_mut(arg_id)
        .ok_or_else(|| ScanError::invalid_format_string("argument index out of range"))?;
    validate::check(specs, arg.category())?;

    if skips_leading_whitespace(specs, arg) {
        skip_whitespace(buffer)?;
    }
    if matches!(specs.align, Align::Right | Align::Center) {
        skip_fill_run(buffer, specs)?;
    }

    dispatch(buffer, specs, locale, arg)?;

    if matches!(specs.align, Align::Left | Align::Center) {
        skip_fill_run(buffer, specs)?;
    }
    Ok(())
}

/// Character-like fields take the source as-is; everything else skips
/// leading whitespace.
fn skips_leading_whitespace(specs: &FormatSpecs<'_>, arg: &ScanArg<'_, '_>) -> bool {
    if matches!(arg, ScanArg::Char(_) | ScanArg::Bytes(_)) {
        return false;
    }
    !matches!(
        specs.presentation,
        Presentation::Character
            | Presentation::EscapedCharacter
            | Presentation::CharSet
            | Presentation::Regex
            | Presentation::RegexEscaped
    )
}

/// Consume a (possibly empty) run of the field's fill code point.
fn skip_fill_run(buffer: &mut ScanBuffer<'_>, specs: &FormatSpecs<'_>) -> ScanResult<()> {
    let fill = specs.fill.as_char();
    while eat_char(buffer, fill)? {}
    Ok(())
}

/// Hand the field to the reader for the argument's kind.
fn dispatch<'s>(
    buffer: &mut ScanBuffer<'s>,
    specs: &FormatSpecs<'_>,
    locale: &Locale,
    arg: &mut ScanArg<'_, 's>,
) -> ScanResult<()> {
    match arg {
        ScanArg::I8(dest) => **dest = read_int(buffer, specs, locale)?,
        ScanArg::I16(dest) => **dest = read_int(buffer, specs, locale)?,
        ScanArg::I32(dest) => **dest = read_int(buffer, specs, locale)?,
        ScanArg::I64(dest) => **dest = read_int(buffer, specs, locale)?,
        ScanArg::Isize(dest) => **dest = read_int(buffer, specs, locale)?,
        ScanArg::U8(dest) => **dest = read_int(buffer, specs, locale)?,
        ScanArg::U16(dest) => **dest = read_int(buffer, specs, locale)?,
        ScanArg::U32(dest) => **dest = read_int(buffer, specs, locale)?,
        ScanArg::U64(dest) => **dest = read_int(buffer, specs, locale)?,
        ScanArg::Usize(dest) => **dest = read_int(buffer, specs, locale)?,
        ScanArg::F32(dest) => **dest = read_float(buffer, specs, locale)?,
        ScanArg::F64(dest) => **dest = read_float(buffer, specs, locale)?,
        ScanArg::Bool(dest) => **dest = read_bool(buffer, specs, locale)?,
        ScanArg::Char(dest) => **dest = read_char(buffer)?,
        ScanArg::Bytes(dest) => read_byte_span(buffer, dest)?,
        ScanArg::Str(dest) => {
            read_string(buffer, specs, &mut StringSink::Owned(&mut **dest))?;
        }
        ScanArg::StrView(dest) => {
            read_string(buffer, specs, &mut StringSink::View(&mut **dest))?;
        }
        ScanArg::Ptr(dest) => {
            // A pointer is a hex integer even without a presentation.
            let mut hex_specs = *specs;
            if hex_specs.presentation == Presentation::None {
                hex_specs.presentation = Presentation::Pointer;
            }
            let addr: usize = read_int(buffer, &hex_specs, locale)?;
            **dest = addr as *const ();
        }
        ScanArg::Custom(custom) => custom.scan(buffer, specs, locale)?,
    }
    Ok(())
}

/// String fields select their mode from the presentation.
fn read_string<'s>(
    buffer: &mut ScanBuffer<'s>,
    specs: &FormatSpecs<'_>,
    sink: &mut StringSink<'_, 's>,
) -> ScanResult<()> {
    match specs.presentation {
        Presentation::None | Presentation::String => read_word(buffer, sink),
        Presentation::Character => {
            read_width_bounded(buffer, sink, specs.width, WidthAlgorithm::default())
        }
        Presentation::CharSet => read_scanset(buffer, sink, specs),
        Presentation::Regex | Presentation::RegexEscaped => {
            Err(ScanError::invalid_format_string("regex support disabled"))
        }
        _ => Err(ScanError::invalid_format_string(
            "invalid type specifier for string argument",
        )),
    }
}

/// One bit per argument id; each supplied argument must be consumed exactly
/// once.
struct VisitedArgs {
    bits: Vec<u64>,
    visited: usize,
    total: usize,
}

impl VisitedArgs {
    fn new(total: usize) -> Self {
        Self {
            bits: vec![0; total.div_ceil(64)],
            visited: 0,
            total,
        }
    }

    fn visit(&mut self, id: usize) -> ScanResult<()> {
        if id >= self.total {
            return Err(ScanError::invalid_format_string(
                "argument index out of range",
            ));
        }
        let (word, bit) = (id / 64, 1u64 << (id % 64));
        if self.bits[word] & bit != 0 {
            return Err(ScanError::invalid_format_string(
                "argument consumed by two fields",
            ));
        }
        self.bits[word] |= bit;
        self.visited += 1;
        Ok(())
    }

    fn check_exhausted(&self) -> ScanResult<()> {
        if self.visited == self.total {
            Ok(())
        } else {
            Err(ScanError::invalid_format_string(
                "argument list not exhausted",
            ))
        }
    }
}

#[cfg(test)]
mod tests;
