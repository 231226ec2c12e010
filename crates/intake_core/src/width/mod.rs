//! Text-width estimation for width-bounded reads.
//!
//! A `{:10}` string field is bounded by *display width*, not by code units or
//! code points. The default algorithm assigns width 2 to the East-Asian-wide
//! and emoji ranges and width 1 to everything else; the alternatives count
//! code units or code points directly.

/// How to measure the width of scanned text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthAlgorithm {
    /// East-Asian-wide and emoji ranges count as 2, the rest as 1.
    #[default]
    EastAsian,
    /// One per code unit (UTF-8 byte).
    CodeUnits,
    /// One per code point.
    CodePoints,
}

/// Width of a single code point under `algorithm`.
pub fn code_point_width(cp: char, algorithm: WidthAlgorithm) -> usize {
    match algorithm {
        WidthAlgorithm::EastAsian => east_asian_width(cp),
        WidthAlgorithm::CodeUnits => cp.len_utf8(),
        WidthAlgorithm::CodePoints => 1,
    }
}

/// Width of a string under `algorithm`.
pub fn text_width(s: &str, algorithm: WidthAlgorithm) -> usize {
    match algorithm {
        WidthAlgorithm::CodeUnits => s.len(),
        WidthAlgorithm::CodePoints => s.chars().count(),
        WidthAlgorithm::EastAsian => s.chars().map(east_asian_width).sum(),
    }
}

/// Fixed East-Asian-Width-style mapping: 2 for wide ranges, 1 otherwise.
fn east_asian_width(cp: char) -> usize {
    let cp = u32::from(cp);
    let wide = cp >= 0x1100
        && (cp <= 0x115F // Hangul Jamo initial consonants
            || cp == 0x2329 // left-pointing angle bracket
            || cp == 0x232A // right-pointing angle bracket
            // CJK through Yi, except ideographic half fill space
            || (0x2E80..=0xA4CF).contains(&cp) && cp != 0x303F
            || (0xAC00..=0xD7A3).contains(&cp) // Hangul syllables
            || (0xF900..=0xFAFF).contains(&cp) // CJK compatibility ideographs
            || (0xFE10..=0xFE19).contains(&cp) // vertical forms
            || (0xFE30..=0xFE6F).contains(&cp) // CJK compatibility forms
            || (0xFF00..=0xFF60).contains(&cp) // fullwidth forms
            || (0xFFE0..=0xFFE6).contains(&cp)
            || (0x2_0000..=0x2_FFFD).contains(&cp) // CJK extensions
            || (0x3_0000..=0x3_FFFD).contains(&cp)
            // misc symbols and pictographs, emoticons
            || (0x1_F300..=0x1_F64F).contains(&cp)
            // supplemental symbols and pictographs
            || (0x1_F900..=0x1_F9FF).contains(&cp));
    if wide {
        2
    } else {
        1
    }
}
