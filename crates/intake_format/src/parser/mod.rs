//! Single-pass, allocation-free format-string parser.
//!
//! The parser is a pull tokenizer: each [`next_event`](FormatParser::next_event)
//! call consumes one run of the format string and returns a [`FormatEvent`]
//! borrowing from it. Replacement fields come out with their specification
//! fully parsed; argument-kind validation is the caller's job (see
//! [`crate::validate`]).
//!
//! Grammar:
//!
//! ```text
//! format  := ( literal | field )*
//! field   := '{' [ arg_id ] [ ':' spec ] '}'
//!         |  '{{' | '}}'                    -- doubled braces, literal
//! arg_id  := integer
//! spec    := [ fill align ] [ width ] [ 'L' ] [ type ]
//! type    := one char | 'r' base | '[' scanset ']' | '/' regex '/' flags
//! ```
//!
//! Mixing automatic and manual argument ids anywhere in one format string is
//! an error, in either order.

use intake_core::{unicode, ScanError, ScanResult};

use crate::specs::{Align, Fill, FormatSpecs, Presentation, RegexFlags};

/// One parsed piece of a format string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatEvent<'a> {
    /// Literal text that must match the source exactly.
    Literal(&'a str),
    /// A whitespace run, matching any (possibly empty) whitespace run in
    /// the source.
    Whitespace(&'a str),
    /// A replacement field, consuming one argument.
    Field {
        /// Zero-based argument id, explicit or auto-assigned.
        arg_id: usize,
        /// The field's parsed specification.
        specs: FormatSpecs<'a>,
    },
}

/// Tracks the format string's argument id style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArgIdPolicy {
    /// No field seen yet.
    Unknown,
    /// `{}` style; the next auto id to hand out.
    Auto(usize),
    /// `{0}` style.
    Manual,
}

/// Pull parser over one format string.
pub struct FormatParser<'a> {
    fmt: &'a str,
    pos: usize,
    policy: ArgIdPolicy,
}

impl<'a> FormatParser<'a> {
    /// Parser positioned at the start of `fmt`.
    pub fn new(fmt: &'a str) -> Self {
        Self {
            fmt,
            pos: 0,
            policy: ArgIdPolicy::Unknown,
        }
    }

    /// Number of replacement fields a full parse of `fmt` produces, or the
    /// first error. Used by callers that must size per-argument state before
    /// driving a scan.
    pub fn count_fields(fmt: &'a str) -> ScanResult<usize> {
        let mut parser = Self::new(fmt);
        let mut n = 0;
        while let Some(event) = parser.next_event()? {
            if matches!(event, FormatEvent::Field { .. }) {
                n += 1;
            }
        }
        Ok(n)
    }

    /// The next event, or `None` at the end of the format string.
    pub fn next_event(&mut self) -> ScanResult<Option<FormatEvent<'a>>> {
        let Some(&first) = self.bytes().first() else {
            return Ok(None);
        };
        match first {
            b'{' if self.byte_at(self.pos + 1) == Some(b'{') => {
                let brace = &self.fmt[self.pos..=self.pos];
                self.pos += 2;
                Ok(Some(FormatEvent::Literal(brace)))
            }
            b'{' => self.parse_field().map(Some),
            b'}' if self.byte_at(self.pos + 1) == Some(b'}') => {
                let brace = &self.fmt[self.pos..=self.pos];
                self.pos += 2;
                Ok(Some(FormatEvent::Literal(brace)))
            }
            b'}' => Err(ScanError::invalid_format_string(
                "unmatched '}' in format string",
            )),
            _ => self.literal_run().map(Some),
        }
    }

    // ─── Literal and whitespace runs ───────────────────────────────

    /// Consume a run of whitespace or a run of literal text.
    fn literal_run(&mut self) -> ScanResult<FormatEvent<'a>> {
        let rest = &self.fmt[self.pos..];
        let bytes = rest.as_bytes();

        // Whitespace run: matches any whitespace run in the source.
        if rest.chars().next().is_some_and(char::is_whitespace) {
            let end = rest
                .char_indices()
                .find(|&(_, c)| !c.is_whitespace())
                .map_or(rest.len(), |(i, _)| i);
            self.pos += end;
            return Ok(FormatEvent::Whitespace(&rest[..end]));
        }

        // Literal run: up to the next brace or whitespace.
        let brace = memchr::memchr2(b'{', b'}', bytes);
        let space = unicode::find_whitespace(bytes);
        let end = match (brace, space) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => rest.len(),
        };
        debug_assert!(end > 0, "literal run cannot be empty");
        self.pos += end;
        Ok(FormatEvent::Literal(&rest[..end]))
    }

    // ─── Replacement fields ────────────────────────────────────────

    /// Parse one `{…}` field; `self.pos` is at the opening brace.
    fn parse_field(&mut self) -> ScanResult<FormatEvent<'a>> {
        self.pos += 1; // '{'
        let arg_id = match self.bytes().first() {
            None => {
                return Err(ScanError::invalid_format_string(
                    "unexpected end of replacement field",
                ))
            }
            Some(b'}' | b':') => self.auto_arg_id()?,
            Some(b'0'..=b'9') => {
                let id = self
                    .parse_simple_int()
                    .ok_or_else(|| ScanError::invalid_format_string("invalid argument id"))?;
                self.manual_arg_id()?;
                id
            }
            Some(_) => return Err(ScanError::invalid_format_string("invalid argument id")),
        };

        let specs = match self.bytes().first() {
            Some(b'}') => FormatSpecs::default(),
            Some(b':') => {
                self.pos += 1;
                if self.bytes().first().is_none() {
                    return Err(ScanError::invalid_format_string(
                        "unexpected end of replacement field",
                    ));
                }
                self.parse_specs()?
            }
            _ => {
                return Err(ScanError::invalid_format_string(
                    "missing '}' in format string",
                ))
            }
        };

        match self.bytes().first() {
            Some(b'}') => {
                self.pos += 1;
                Ok(FormatEvent::Field { arg_id, specs })
            }
            Some(_) => Err(ScanError::invalid_format_string("unknown format specifier")),
            None => Err(ScanError::invalid_format_string(
                "missing '}' in format string",
            )),
        }
    }

    fn auto_arg_id(&mut self) -> ScanResult<usize> {
        match self.policy {
            ArgIdPolicy::Unknown => {
                self.policy = ArgIdPolicy::Auto(1);
                Ok(0)
            }
            ArgIdPolicy::Auto(next) => {
                self.policy = ArgIdPolicy::Auto(next + 1);
                Ok(next)
            }
            ArgIdPolicy::Manual => Err(ScanError::invalid_format_string(
                "cannot mix automatic and manual argument indexing",
            )),
        }
    }

    fn manual_arg_id(&mut self) -> ScanResult<()> {
        match self.policy {
            ArgIdPolicy::Unknown => {
                self.policy = ArgIdPolicy::Manual;
                Ok(())
            }
            ArgIdPolicy::Manual => Ok(()),
            ArgIdPolicy::Auto(_) => Err(ScanError::invalid_format_string(
                "cannot mix automatic and manual argument indexing",
            )),
        }
    }

    // ─── Specs ─────────────────────────────────────────────────────

    /// Parse the spec between `:` and `}`. Leaves `self.pos` at the closing
    /// brace (or at the offending byte on error).
    fn parse_specs(&mut self) -> ScanResult<FormatSpecs<'a>> {
        let mut specs = FormatSpecs::default();

        // Fast path: a single presentation letter directly before '}'.
        if let (Some(&first), Some(b'}')) = (self.bytes().first(), self.byte_at(self.pos + 1)) {
            if first.is_ascii_alphabetic() && first != b'L' {
                self.parse_presentation(&mut specs)?;
                return Ok(specs);
            }
        }

        self.parse_align(&mut specs)?;

        if matches!(self.bytes().first(), Some(b'0'..=b'9')) {
            specs.width = self
                .parse_simple_int()
                .ok_or_else(|| ScanError::invalid_format_string("invalid field width"))?;
        }

        if self.bytes().first() == Some(&b'L') {
            specs.localized = true;
            self.pos += 1;
        }

        match self.bytes().first() {
            None => Err(ScanError::invalid_format_string(
                "unexpected end of format string",
            )),
            Some(b'}') => Ok(specs),
            Some(_) => {
                self.parse_presentation(&mut specs)?;
                Ok(specs)
            }
        }
    }

    /// Parse `[fill] align`, leaving the position untouched when neither is
    /// present.
    fn parse_align(&mut self, specs: &mut FormatSpecs<'a>) -> ScanResult<()> {
        let Some((fill_cp, fill_len)) = unicode::decode_code_point(self.bytes()) else {
            return Err(ScanError::invalid_format_string(
                "invalid encoding in fill character",
            ));
        };

        let align_on_fill = align_of(fill_cp);
        let after_fill = self.pos + fill_len;
        if after_fill >= self.fmt.len() {
            return Ok(());
        }

        if fill_len == 1 {
            if fill_cp == '{' {
                return Err(ScanError::invalid_format_string(
                    "invalid fill character '{'",
                ));
            }
            if fill_cp == '[' {
                // Scanset, not a fill.
                return Ok(());
            }
        }

        let align_after = self
            .byte_at(after_fill)
            .map_or(Align::None, |b| align_of(char::from(b)));

        if align_after == Align::None {
            if align_on_fill != Align::None {
                specs.align = align_on_fill;
                self.pos = after_fill;
            }
            return Ok(());
        }

        specs.fill = Fill::from_encoded(&self.fmt[self.pos..after_fill]);
        specs.align = align_after;
        self.pos = after_fill + 1;
        Ok(())
    }

    /// Parse the presentation part: a type letter, `rNN`, a scanset, or a
    /// regex.
    fn parse_presentation(&mut self, specs: &mut FormatSpecs<'a>) -> ScanResult<()> {
        match self.bytes().first() {
            Some(b'[') => self.parse_scanset(specs),
            Some(b'/') => self.parse_regex(specs),
            Some(&c) => {
                self.pos += 1;
                specs.presentation = match c {
                    b'b' | b'B' => Presentation::IntBinary,
                    b'd' => Presentation::IntDecimal,
                    b'i' => Presentation::IntGeneric,
                    b'u' => Presentation::IntUnsignedDecimal,
                    b'o' => Presentation::IntOctal,
                    b'x' | b'X' => Presentation::IntHex,
                    b'r' | b'R' => {
                        let base = self.parse_simple_int().ok_or_else(|| {
                            ScanError::invalid_format_string("invalid base for 'r' type specifier")
                        })?;
                        if !(2..=36).contains(&base) {
                            return Err(ScanError::invalid_format_string(
                                "arbitrary base must be between 2 and 36",
                            ));
                        }
                        specs.arbitrary_base = u8::try_from(base).unwrap_or(0);
                        Presentation::IntArbitraryBase
                    }
                    b'a' | b'A' => Presentation::FloatHex,
                    b'e' | b'E' => Presentation::FloatScientific,
                    b'f' | b'F' => Presentation::FloatFixed,
                    b'g' | b'G' => Presentation::FloatGeneral,
                    b's' => Presentation::String,
                    b'c' => Presentation::Character,
                    b'?' => Presentation::EscapedCharacter,
                    b'p' => Presentation::Pointer,
                    _ => {
                        return Err(ScanError::invalid_format_string(
                            "invalid type specifier in format string",
                        ))
                    }
                };
                Ok(())
            }
            None => Err(ScanError::invalid_format_string(
                "unexpected end of format string",
            )),
        }
    }

    /// Parse `[…]`; `self.pos` is at the opening bracket.
    fn parse_scanset(&mut self, specs: &mut FormatSpecs<'a>) -> ScanResult<()> {
        self.pos += 1; // '['
        if self.bytes().first() == Some(&b'^') {
            specs.charset_is_inverted = true;
            self.pos += 1;
        }
        let body_start = self.pos;

        // ']' as the very first set member is a literal.
        if self.bytes().first() == Some(&b']') {
            add_charset_single(specs, ']');
            self.pos += 1;
        }

        loop {
            match self.bytes().first() {
                None => {
                    return Err(ScanError::invalid_format_string(
                        "unmatched '[' in format string",
                    ))
                }
                Some(b']') => {
                    specs.charset_string = &self.fmt[body_start..self.pos];
                    if specs.charset_string.is_empty() {
                        return Err(ScanError::invalid_format_string(
                            "empty character set in format string",
                        ));
                    }
                    specs.presentation = Presentation::CharSet;
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.parse_scanset_literal(specs)?,
            }
        }
    }

    /// One scanset member: a code point or a `x-y` range.
    fn parse_scanset_literal(&mut self, specs: &mut FormatSpecs<'_>) -> ScanResult<()> {
        let first = self.scanset_code_point()?;

        // A '-' introduces a range unless it is the last body char.
        if self.bytes().first() == Some(&b'-') && self.byte_at(self.pos + 1) != Some(b']') {
            self.pos += 1;
            let second = self.scanset_code_point()?;
            if second < first {
                return Err(ScanError::invalid_format_string(
                    "invalid range in character set: end before start",
                ));
            }
            add_charset_range(specs, first, second);
            return Ok(());
        }

        add_charset_single(specs, first);
        Ok(())
    }

    fn scanset_code_point(&mut self) -> ScanResult<char> {
        match unicode::decode_code_point(self.bytes()) {
            Some((cp, len)) => {
                self.pos += len;
                Ok(cp)
            }
            None => Err(ScanError::invalid_format_string(
                "invalid encoding in format string",
            )),
        }
    }

    /// Parse `/pattern/flags`; `self.pos` is at the opening slash.
    fn parse_regex(&mut self, specs: &mut FormatSpecs<'a>) -> ScanResult<()> {
        self.pos += 1; // '/'
        let pattern_start = self.pos;
        specs.presentation = Presentation::Regex;

        loop {
            match self.bytes().first() {
                None => {
                    return Err(ScanError::invalid_format_string(
                        "unexpected end of regex in format string",
                    ))
                }
                Some(b'/') => {
                    if self.pos > pattern_start
                        && self.fmt.as_bytes()[self.pos - 1] == b'\\'
                    {
                        specs.presentation = Presentation::RegexEscaped;
                        self.pos += 1;
                        continue;
                    }
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }

        specs.charset_string = &self.fmt[pattern_start..self.pos];
        if specs.charset_string.is_empty() {
            return Err(ScanError::invalid_format_string(
                "empty regex in format string",
            ));
        }
        self.pos += 1; // closing '/'

        let mut flags = RegexFlags::empty();
        loop {
            let flag = match self.bytes().first() {
                None => {
                    return Err(ScanError::invalid_format_string(
                        "unexpected end of regex in format string",
                    ))
                }
                Some(b'}') => break,
                Some(b'm') => RegexFlags::MULTILINE,
                Some(b's') => RegexFlags::SINGLELINE,
                Some(b'i') => RegexFlags::NOCASE,
                Some(b'n') => RegexFlags::NOCAPTURE,
                Some(_) => return Err(ScanError::invalid_format_string("invalid flag in regex")),
            };
            if flags.contains(flag) {
                return Err(ScanError::invalid_format_string(
                    "flag set multiple times in regex",
                ));
            }
            flags |= flag;
            self.pos += 1;
        }
        specs.regex_flags = flags;
        Ok(())
    }

    // ─── Low-level helpers ─────────────────────────────────────────

    /// Bytes from the current position to the end of the format string.
    #[inline]
    fn bytes(&self) -> &'a [u8] {
        &self.fmt.as_bytes()[self.pos..]
    }

    #[inline]
    fn byte_at(&self, i: usize) -> Option<u8> {
        self.fmt.as_bytes().get(i).copied()
    }

    /// Parse a nonnegative decimal integer, `None` on overflow.
    ///
    /// The caller has checked that the current byte is a digit.
    fn parse_simple_int(&mut self) -> Option<usize> {
        let mut value: usize = 0;
        let mut any = false;
        while let Some(&b @ b'0'..=b'9') = self.bytes().first() {
            any = true;
            value = value
                .checked_mul(10)?
                .checked_add(usize::from(b - b'0'))?;
            self.pos += 1;
        }
        if any {
            Some(value)
        } else {
            None
        }
    }
}

fn align_of(c: char) -> Align {
    match c {
        '<' => Align::Left,
        '>' => Align::Right,
        '^' => Align::Center,
        _ => Align::None,
    }
}

fn add_charset_single(specs: &mut FormatSpecs<'_>, cp: char) {
    let value = u32::from(cp);
    if value < 128 {
        specs.charset_literals |= 1u128 << value;
    } else {
        specs.charset_has_nonascii = true;
    }
}

fn add_charset_range(specs: &mut FormatSpecs<'_>, from: char, to: char) {
    let lo = u32::from(from);
    let hi = u32::from(to);
    // ASCII portion into the bitmap; anything above flags the slow path.
    for v in lo..=hi.min(127) {
        specs.charset_literals |= 1u128 << v;
    }
    if hi > 127 {
        specs.charset_has_nonascii = true;
    }
}
