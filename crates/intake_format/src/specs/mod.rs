//! Per-field format specification model.
//!
//! One [`FormatSpecs`] value is produced for every replacement field in a
//! format string. It borrows the raw scanset/regex body from the format
//! string for slow-path matching; everything else is inline data.

use bitflags::bitflags;

/// Alignment requested by a replacement field.
///
/// Scanning consumes runs of the fill code point on the side(s) the
/// alignment implies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    /// No alignment given.
    #[default]
    None,
    /// `<`: value first, fill after.
    Left,
    /// `>`: fill first, value after.
    Right,
    /// `^`: fill on both sides.
    Center,
}

/// Presentation type of a replacement field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Presentation {
    /// No presentation given; the argument kind picks its default.
    #[default]
    None,
    /// `b`/`B`: binary integer.
    IntBinary,
    /// `d`: decimal integer.
    IntDecimal,
    /// `i`: integer with base detected from prefix.
    IntGeneric,
    /// `u`: unsigned decimal integer; no sign accepted.
    IntUnsignedDecimal,
    /// `o`: octal integer.
    IntOctal,
    /// `x`/`X`: hexadecimal integer.
    IntHex,
    /// `rNN`/`RNN`: integer in an arbitrary base 2..=36.
    IntArbitraryBase,
    /// `a`/`A`: hexadecimal float.
    FloatHex,
    /// `e`/`E`: scientific float.
    FloatScientific,
    /// `f`/`F`: fixed-point float.
    FloatFixed,
    /// `g`/`G`: general float (fixed or scientific).
    FloatGeneral,
    /// `s`: whitespace-delimited word.
    String,
    /// `[…]`: character-set match.
    CharSet,
    /// `/…/flags`: regular-expression match.
    Regex,
    /// Regex whose pattern contains an escaped `/`.
    RegexEscaped,
    /// `c`: a single code point, or width-bounded text on strings.
    Character,
    /// `?`: escaped character.
    EscapedCharacter,
    /// `p`: pointer as hexadecimal.
    Pointer,
}

bitflags! {
    /// Flags trailing a regex presentation (`/pat/msin`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct RegexFlags: u8 {
        /// `m`: `^`/`$` match at line boundaries.
        const MULTILINE = 1;
        /// `s`: `.` matches newlines.
        const SINGLELINE = 1 << 1;
        /// `i`: case-insensitive.
        const NOCASE = 1 << 2;
        /// `n`: no capture groups.
        const NOCAPTURE = 1 << 3;
    }
}

/// A fill code point: 1–4 code units, stored inline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fill {
    bytes: [u8; 4],
    len: u8,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            bytes: [b' ', 0, 0, 0],
            len: 1,
        }
    }
}

impl Fill {
    /// Build from the UTF-8 encoding of a single code point.
    ///
    /// # Contract
    ///
    /// `encoded` must be the encoding of exactly one code point (1–4 bytes);
    /// the format parser guarantees this.
    pub(crate) fn from_encoded(encoded: &str) -> Self {
        debug_assert!(!encoded.is_empty() && encoded.len() <= 4);
        debug_assert_eq!(encoded.chars().count(), 1);
        let mut bytes = [0u8; 4];
        bytes[..encoded.len()].copy_from_slice(encoded.as_bytes());
        Self {
            bytes,
            len: u8::try_from(encoded.len()).unwrap_or(4),
        }
    }

    /// The fill's code units.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    /// The fill as a code point.
    pub fn as_char(&self) -> char {
        std::str::from_utf8(self.as_bytes())
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(' ')
    }
}

/// Fully parsed specification of one replacement field.
///
/// Borrows the raw scanset/regex body from the format string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormatSpecs<'a> {
    /// Maximum field width; 0 means "no bound".
    pub width: usize,
    /// Fill code point consumed around the value per `align`.
    pub fill: Fill,
    /// Requested alignment.
    pub align: Align,
    /// Presentation type.
    pub presentation: Presentation,
    /// Base for [`Presentation::IntArbitraryBase`], 2..=36.
    pub arbitrary_base: u8,
    /// Bitmap of accepted ASCII code points for `[…]` fields.
    pub charset_literals: u128,
    /// True when the scanset mentions code points above ASCII.
    pub charset_has_nonascii: bool,
    /// True when the scanset is inverted (`[^…]`).
    pub charset_is_inverted: bool,
    /// Raw scanset body (brackets and leading `^` stripped) or regex
    /// pattern, for slow-path matching.
    pub charset_string: &'a str,
    /// Flags of a regex presentation.
    pub regex_flags: RegexFlags,
    /// True when the `L` flag is present.
    pub localized: bool,
}

impl FormatSpecs<'_> {
    /// Resolve the numeric base: explicit presentations win, otherwise
    /// `default_base` (0 meaning "detect from prefix").
    pub fn base_or(&self, default_base: u32) -> u32 {
        match self.presentation {
            Presentation::None | Presentation::IntGeneric => default_base,
            Presentation::IntArbitraryBase => u32::from(self.arbitrary_base),
            Presentation::IntBinary => 2,
            Presentation::IntOctal => 8,
            Presentation::IntDecimal | Presentation::IntUnsignedDecimal => 10,
            Presentation::IntHex | Presentation::Pointer => 16,
            _ => default_base,
        }
    }

    /// Scanset membership for one code point, inversion included.
    ///
    /// ASCII is answered from the bitmap; anything above consults the raw
    /// body (§ the slow path only runs when the set mentions non-ASCII).
    pub fn charset_contains(&self, cp: char) -> bool {
        let value = u32::from(cp);
        let member = if value < 128 {
            self.charset_literals & (1u128 << value) != 0
        } else if self.charset_has_nonascii {
            charset_body_contains(self.charset_string, cp)
        } else {
            false
        };
        member != self.charset_is_inverted
    }
}

/// Walk a raw scanset body and test membership of `cp`.
///
/// The body has brackets and any leading `^` already stripped; a `]` can
/// therefore only appear as a literal first character. Ranges are re-derived
/// on the fly: `a-z` is a range, a trailing or leading `-` is a literal.
fn charset_body_contains(body: &str, cp: char) -> bool {
    let mut chars = body.chars().peekable();
    while let Some(first) = chars.next() {
        if chars.peek() == Some(&'-') {
            let mut rest = chars.clone();
            rest.next(); // the '-'
            match rest.next() {
                // `x-y` range; the parser has verified y >= x.
                Some(second) => {
                    if (first..=second).contains(&cp) {
                        return true;
                    }
                    chars = rest;
                    continue;
                }
                // Trailing '-' is a literal.
                None => {}
            }
        }
        if first == cp {
            return true;
        }
    }
    false
}
