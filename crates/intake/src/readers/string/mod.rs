//! String readers: whitespace-delimited word, width-bounded text, and
//! scanset matching.
//!
//! Output goes through a [`StringSink`]: owned destinations collect code
//! points as they are accepted; borrowed views are resolved at the end from
//! the source itself, which therefore must be contiguous.

use intake_core::width::{code_point_width, WidthAlgorithm};
use intake_core::{unicode, ScanBuffer, ScanError, ScanResult};
use intake_format::FormatSpecs;

/// Where scanned text lands.
pub(crate) enum StringSink<'a, 's> {
    /// Owned destination; receives a copy of the matched text.
    Owned(&'a mut String),
    /// Borrowed view into the source; requires a contiguous source.
    View(&'a mut &'s str),
}

/// Read a whitespace-delimited word. Empty words are invalid.
pub(crate) fn read_word<'s>(
    buffer: &mut ScanBuffer<'s>,
    sink: &mut StringSink<'_, 's>,
) -> ScanResult<()> {
    let start = buffer.position();

    // Contiguous fast path: one whitespace search over the rest.
    if buffer.is_contiguous() {
        let window = buffer.buffered_window();
        let end = unicode::find_whitespace(window).unwrap_or(window.len());
        if end == 0 {
            return Err(crate::readers::fail_empty(
                buffer,
                ScanError::invalid_scanned_value("expected a word"),
            ));
        }
        buffer.advance(end);
        if let StringSink::Owned(dest) = sink {
            dest.clear();
            if let Some(text) = buffer.source_slice(start, start + end) {
                dest.push_str(text);
            }
        }
        return finalize(sink, buffer, start);
    }

    let consumed = scan_chars(buffer, sink, |cp| !cp.is_whitespace())?;
    if consumed == 0 {
        return Err(crate::readers::fail_empty(
            buffer,
            ScanError::invalid_scanned_value("expected a word"),
        ));
    }
    finalize(sink, buffer, start)
}

/// Read text until the accumulated display width reaches `width` or a
/// whitespace code point is hit.
pub(crate) fn read_width_bounded<'s>(
    buffer: &mut ScanBuffer<'s>,
    sink: &mut StringSink<'_, 's>,
    width: usize,
    algorithm: WidthAlgorithm,
) -> ScanResult<()> {
    debug_assert!(width > 0, "zero width is rejected at validation");
    let start = buffer.position();
    let mut accumulated = 0usize;
    let consumed = scan_chars(buffer, sink, |cp| {
        if cp.is_whitespace() {
            return false;
        }
        let w = code_point_width(cp, algorithm);
        if accumulated + w > width {
            return false;
        }
        accumulated += w;
        true
    })?;
    if consumed == 0 {
        return Err(crate::readers::fail_empty(
            buffer,
            ScanError::length_too_short("width-bounded read produced no text"),
        ));
    }
    finalize(sink, buffer, start)
}

/// Read the longest prefix of code points matching the field's scanset.
/// An empty match is invalid.
pub(crate) fn read_scanset<'s>(
    buffer: &mut ScanBuffer<'s>,
    sink: &mut StringSink<'_, 's>,
    specs: &FormatSpecs<'_>,
) -> ScanResult<()> {
    let start = buffer.position();
    let consumed = scan_chars(buffer, sink, |cp| specs.charset_contains(cp))?;
    if consumed == 0 {
        return Err(crate::readers::fail_empty(
            buffer,
            ScanError::invalid_scanned_value("no characters matched the set"),
        ));
    }
    finalize(sink, buffer, start)
}

/// Consume code points while `accept` holds, feeding owned sinks along the
/// way. Returns the number of code units consumed.
///
/// Invalid encoding ends the run; whether a partial match is acceptable is
/// the caller's decision.
fn scan_chars<'s>(
    buffer: &mut ScanBuffer<'s>,
    sink: &mut StringSink<'_, 's>,
    mut accept: impl FnMut(char) -> bool,
) -> ScanResult<usize> {
    let start = buffer.position();
    if let StringSink::Owned(dest) = sink {
        dest.clear();
    }
    loop {
        let decoded = match buffer.peek_char() {
            Ok(d) => d,
            Err(e) if e.is_recoverable() => None,
            Err(e) => return Err(e),
        };
        let Some((cp, len)) = decoded else { break };
        if !accept(cp) {
            break;
        }
        if let StringSink::Owned(dest) = sink {
            dest.push(cp);
        }
        buffer.advance(len);
    }
    Ok(buffer.position() - start)
}

/// Resolve a view sink from the consumed span of the source.
fn finalize<'s>(
    sink: &mut StringSink<'_, 's>,
    buffer: &ScanBuffer<'s>,
    start: usize,
) -> ScanResult<()> {
    if let StringSink::View(view) = sink {
        let slice = buffer.source_slice(start, buffer.position()).ok_or_else(|| {
            ScanError::invalid_scanned_value("cannot scan a string view: source is not contiguous")
        })?;
        **view = slice;
    }
    Ok(())
}
