//! Rewindable scan buffer over a contiguous string, a code-unit iterator, or
//! a byte stream.
//!
//! The buffer exposes a monotonic byte position over the source. Positions at
//! or above the last [`commit`](ScanBuffer::commit) point can be re-examined:
//! [`rewind`](ScanBuffer::rewind) repositions in O(1) by replaying from the
//! putback storage the non-contiguous shapes maintain. Committing declares a
//! prefix permanent and lets that storage shrink.
//!
//! # Shapes
//!
//! Three concrete shapes behind one enum, dispatched inline (no vtable on
//! `peek`):
//!
//! - **Contiguous**: a borrowed `&str`. Rewind is a pointer move; no putback
//!   storage exists.
//! - **Iterator**: any `Iterator<Item = u8>`. Every code unit pulled is
//!   appended to the putback vector; the uncommitted suffix of that vector
//!   is what rewind replays.
//! - **Stream**: any `BufRead`. Bytes are observed through the reader's own
//!   buffer where possible and consumed from it only when committed or when
//!   lookahead must cross its edge, so an `input!`-style scan leaves
//!   unconsumed bytes in the underlying stream for the next scan.
//!
//! # Invariant
//!
//! For the non-contiguous shapes, `putback ++ reader_window` is exactly the
//! uncommitted prefix of the source read so far. End-of-source is not an
//! error here: `peek` returns `None` and the *reader* decides whether more
//! input was required.

use std::io::BufRead;

use crate::error::{ScanError, ScanResult};
use crate::unicode;

/// Uniform, rewindable view over a scan source.
///
/// Created per scan call; mutably borrows the source for its lifetime.
pub struct ScanBuffer<'a> {
    shape: Shape<'a>,
    /// Current read position, in code units from the start of the source.
    pos: usize,
    /// Lowest position that may still be rewound to.
    committed: usize,
}

enum Shape<'a> {
    Contiguous {
        data: &'a str,
    },
    Iter {
        iter: Box<dyn Iterator<Item = u8> + 'a>,
        putback: Putback,
        exhausted: bool,
    },
    Stream {
        reader: Box<dyn BufRead + 'a>,
        putback: Putback,
        /// Bytes consumed from `reader` so far; the reader's window starts
        /// at this absolute position.
        consumed: usize,
        exhausted: bool,
    },
}

/// Growable storage of already-read, uncommitted code units.
#[derive(Default)]
struct Putback {
    bytes: Vec<u8>,
    /// Absolute position of `bytes[0]`.
    base: usize,
}

impl Putback {
    fn high_water(&self) -> usize {
        self.base + self.bytes.len()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        pos.checked_sub(self.base)
            .and_then(|i| self.bytes.get(i))
            .copied()
    }

    /// Slice from absolute position `pos`, at most `n` bytes.
    fn slice_at(&self, pos: usize, n: usize) -> &[u8] {
        let start = pos.saturating_sub(self.base).min(self.bytes.len());
        let end = pos
            .saturating_add(n)
            .saturating_sub(self.base)
            .min(self.bytes.len());
        &self.bytes[start..end]
    }

    /// Drop everything below `to`. No-op when `to` is at or below the base.
    fn truncate_front(&mut self, to: usize) {
        if to > self.base {
            let n = (to - self.base).min(self.bytes.len());
            self.bytes.drain(..n);
            self.base += n;
        }
    }
}

/// Pull one chunk from the reader's window into the putback storage.
///
/// Returns `Ok(false)` at end of stream. After a successful spill the
/// putback's high-water mark equals `consumed`.
fn spill_chunk(
    reader: &mut (dyn BufRead + '_),
    putback: &mut Putback,
    consumed: &mut usize,
    exhausted: &mut bool,
) -> ScanResult<bool> {
    let chunk = reader
        .fill_buf()
        .map_err(|_| ScanError::io_error("failed to read from stream"))?;
    if chunk.is_empty() {
        *exhausted = true;
        return Ok(false);
    }
    // A committed gap may sit between stale putback coverage and the
    // window; re-anchor empty storage at the window start.
    if putback.bytes.is_empty() {
        putback.base = *consumed;
    }
    debug_assert_eq!(putback.high_water(), *consumed, "putback/window split");
    let len = chunk.len();
    putback.bytes.extend_from_slice(chunk);
    reader.consume(len);
    *consumed += len;
    Ok(true)
}

impl<'a> ScanBuffer<'a> {
    /// Buffer over a contiguous in-memory source.
    pub fn from_str(data: &'a str) -> Self {
        Self {
            shape: Shape::Contiguous { data },
            pos: 0,
            committed: 0,
        }
    }

    /// Buffer over an arbitrary code-unit iterator.
    pub fn from_byte_iter(iter: impl Iterator<Item = u8> + 'a) -> Self {
        Self {
            shape: Shape::Iter {
                iter: Box::new(iter),
                putback: Putback::default(),
                exhausted: false,
            },
            pos: 0,
            committed: 0,
        }
    }

    /// Buffer over a buffered byte stream.
    pub fn from_reader(reader: impl BufRead + 'a) -> Self {
        Self {
            shape: Shape::Stream {
                reader: Box::new(reader),
                putback: Putback::default(),
                consumed: 0,
                exhausted: false,
            },
            pos: 0,
            committed: 0,
        }
    }

    /// Current read position, in code units consumed from the source start.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Lowest position still available to [`rewind`](Self::rewind).
    #[inline]
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// True when the range starting at the current position can be exposed
    /// as a single borrowed span of the original source.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        matches!(self.shape, Shape::Contiguous { .. })
    }

    /// The code unit at the current position, without advancing.
    ///
    /// `Ok(None)` means end of source. `Err` only on stream I/O failure.
    #[inline]
    pub fn peek(&mut self) -> ScanResult<Option<u8>> {
        self.byte_at(self.pos)
    }

    /// The code unit at the current position, advancing past it.
    #[inline]
    pub fn get(&mut self) -> ScanResult<Option<u8>> {
        let b = self.byte_at(self.pos)?;
        if b.is_some() {
            self.pos += 1;
        }
        Ok(b)
    }

    /// Advance by `n` code units.
    ///
    /// # Contract
    ///
    /// The skipped code units must already have been observed via `peek`,
    /// `lookahead`, or `peek_char`.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Reposition to a previously-observed position.
    ///
    /// # Contract
    ///
    /// `committed() <= to <= position()` high-water. Rewinding below the
    /// commit point is a driver bug; in release builds the position saturates
    /// at the commit point.
    pub fn rewind(&mut self, to: usize) {
        debug_assert!(to >= self.committed, "rewind below commit point");
        self.pos = to.max(self.committed);
    }

    /// Declare that positions below `to` will never be rewound to.
    ///
    /// Shrinks putback storage; for stream sources, consumes the committed
    /// prefix from the underlying reader.
    pub fn commit(&mut self, to: usize) {
        if to <= self.committed {
            return;
        }
        self.committed = to;
        match &mut self.shape {
            Shape::Contiguous { .. } => {}
            Shape::Iter { putback, .. } => putback.truncate_front(to),
            Shape::Stream {
                reader,
                putback,
                consumed,
                ..
            } => {
                putback.truncate_front(to);
                // Bytes observed through the reader's window but never
                // spilled: consume them from the stream now.
                if to > *consumed {
                    reader.consume(to - *consumed);
                    *consumed = to;
                }
            }
        }
    }

    /// Up to `n` code units starting at the current position, without
    /// advancing. Shorter than `n` only at end of source.
    pub fn lookahead(&mut self, n: usize) -> ScanResult<&[u8]> {
        let pos = self.pos;
        match &mut self.shape {
            Shape::Contiguous { data } => {
                let bytes = data.as_bytes();
                let start = pos.min(bytes.len());
                let end = pos.saturating_add(n).min(bytes.len());
                Ok(&bytes[start..end])
            }
            Shape::Iter {
                iter,
                putback,
                exhausted,
            } => {
                while !*exhausted && putback.high_water() < pos + n {
                    match iter.next() {
                        Some(b) => putback.bytes.push(b),
                        None => *exhausted = true,
                    }
                }
                Ok(putback.slice_at(pos, n))
            }
            Shape::Stream {
                reader,
                putback,
                consumed,
                exhausted,
            } => {
                while !*exhausted && putback.high_water() < pos + n {
                    if !spill_chunk(reader.as_mut(), putback, consumed, exhausted)? {
                        break;
                    }
                }
                Ok(putback.slice_at(pos, n))
            }
        }
    }

    /// Decode the code point at the current position, without advancing.
    ///
    /// `Ok(None)` at end of source; `invalid_scanned_value` when the source
    /// is not valid UTF-8 at this position.
    pub fn peek_char(&mut self) -> ScanResult<Option<(char, usize)>> {
        let ahead = self.lookahead(4)?;
        if ahead.is_empty() {
            return Ok(None);
        }
        match unicode::decode_code_point(ahead) {
            Some(decoded) => Ok(Some(decoded)),
            None => Err(ScanError::invalid_scanned_value(
                "invalid encoding in input",
            )),
        }
    }

    /// Borrow a range of the original source. Only possible for contiguous
    /// sources, and only on code-point boundaries.
    pub fn source_slice(&self, start: usize, end: usize) -> Option<&'a str> {
        match &self.shape {
            Shape::Contiguous { data } => data.get(start..end),
            _ => None,
        }
    }

    /// The already-buffered code units from the current position onward.
    ///
    /// Never performs I/O; used by fast paths that want a span to chew on.
    /// For contiguous sources this is the whole rest of the input.
    pub fn buffered_window(&self) -> &[u8] {
        match &self.shape {
            Shape::Contiguous { data } => {
                let bytes = data.as_bytes();
                &bytes[self.pos.min(bytes.len())..]
            }
            Shape::Iter { putback, .. } | Shape::Stream { putback, .. } => {
                putback.slice_at(self.pos, usize::MAX - self.pos)
            }
        }
    }

    /// The code unit at an absolute position, filling storage on demand.
    fn byte_at(&mut self, pos: usize) -> ScanResult<Option<u8>> {
        match &mut self.shape {
            Shape::Contiguous { data } => Ok(data.as_bytes().get(pos).copied()),
            Shape::Iter {
                iter,
                putback,
                exhausted,
            } => {
                while !*exhausted && putback.high_water() <= pos {
                    match iter.next() {
                        Some(b) => putback.bytes.push(b),
                        None => *exhausted = true,
                    }
                }
                Ok(putback.byte_at(pos))
            }
            Shape::Stream {
                reader,
                putback,
                consumed,
                exhausted,
            } => loop {
                if let Some(b) = putback.byte_at(pos) {
                    return Ok(Some(b));
                }
                if *exhausted {
                    return Ok(None);
                }
                let chunk = reader
                    .fill_buf()
                    .map_err(|_| ScanError::io_error("failed to read from stream"))?;
                if chunk.is_empty() {
                    *exhausted = true;
                    return Ok(None);
                }
                // The reader's window starts at `consumed`; serve from it
                // without consuming when possible.
                debug_assert!(pos >= *consumed, "uncommitted byte missing from putback");
                let offset = pos - *consumed;
                if offset < chunk.len() {
                    return Ok(Some(chunk[offset]));
                }
                // Deeper than the window: spill it and refill.
                if putback.bytes.is_empty() {
                    putback.base = *consumed;
                }
                let len = chunk.len();
                putback.bytes.extend_from_slice(chunk);
                reader.consume(len);
                *consumed += len;
            },
        }
    }
}
