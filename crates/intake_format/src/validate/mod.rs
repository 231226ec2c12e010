//! Argument-kind-dependent validation of parsed field specifications.
//!
//! The parser accepts anything grammatically well-formed; whether `{:x}` is
//! meaningful depends on the argument it binds to. The driver calls
//! [`check`] with the matched argument's [`ArgCategory`] before dispatching
//! to a reader.

use intake_core::{ScanError, ScanResult};

use crate::specs::{FormatSpecs, Presentation};

/// Coarse argument classification used for spec validation and reader
/// dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgCategory {
    /// Signed integers of any width.
    SignedInt,
    /// Unsigned integers of any width.
    UnsignedInt,
    /// Binary floating point of any width.
    Float,
    /// Booleans.
    Boolean,
    /// A single code point.
    CodePoint,
    /// A fixed-size raw code-unit buffer.
    ByteBuffer,
    /// Owned strings and borrowed views.
    String,
    /// Pointers, read as hexadecimal.
    Pointer,
    /// User-provided scanner; specs are interpreted by the implementor.
    Custom,
}

/// Check `specs` against the matched argument's category.
pub fn check(specs: &FormatSpecs<'_>, category: ArgCategory) -> ScanResult<()> {
    if specs.localized
        && !matches!(
            category,
            ArgCategory::SignedInt
                | ArgCategory::UnsignedInt
                | ArgCategory::Float
                | ArgCategory::Boolean
        )
    {
        return Err(ScanError::invalid_format_string(
            "'L' flag requires an integer, float, or boolean argument",
        ));
    }

    match category {
        ArgCategory::SignedInt | ArgCategory::UnsignedInt => check_int(specs),
        ArgCategory::Float => check_float(specs),
        ArgCategory::Boolean => check_bool(specs),
        ArgCategory::CodePoint | ArgCategory::ByteBuffer => check_character(specs),
        ArgCategory::String => check_string(specs),
        ArgCategory::Pointer => check_pointer(specs),
        ArgCategory::Custom => Ok(()),
    }
}

fn check_int(specs: &FormatSpecs<'_>) -> ScanResult<()> {
    match specs.presentation {
        Presentation::None
        | Presentation::IntBinary
        | Presentation::IntDecimal
        | Presentation::IntGeneric
        | Presentation::IntUnsignedDecimal
        | Presentation::IntOctal
        | Presentation::IntHex
        | Presentation::IntArbitraryBase => {}
        _ => {
            return Err(ScanError::invalid_format_string(
                "invalid type specifier for integer argument",
            ))
        }
    }
    if specs.localized {
        if specs.presentation == Presentation::IntBinary {
            return Err(ScanError::invalid_format_string(
                "'b'/'B' type specifier not supported for localized integers",
            ));
        }
        if specs.presentation == Presentation::IntArbitraryBase {
            return Err(ScanError::invalid_format_string(
                "arbitrary bases not supported for localized integers",
            ));
        }
    }
    Ok(())
}

fn check_float(specs: &FormatSpecs<'_>) -> ScanResult<()> {
    match specs.presentation {
        Presentation::None
        | Presentation::FloatHex
        | Presentation::FloatScientific
        | Presentation::FloatFixed
        | Presentation::FloatGeneral => Ok(()),
        _ => Err(ScanError::invalid_format_string(
            "invalid type specifier for float argument",
        )),
    }
}

fn check_bool(specs: &FormatSpecs<'_>) -> ScanResult<()> {
    match specs.presentation {
        Presentation::None
        | Presentation::String
        | Presentation::IntGeneric
        | Presentation::IntHex
        | Presentation::IntBinary
        | Presentation::IntUnsignedDecimal
        | Presentation::IntOctal
        | Presentation::IntDecimal => Ok(()),
        _ => Err(ScanError::invalid_format_string(
            "invalid type specifier for boolean argument",
        )),
    }
}

fn check_character(specs: &FormatSpecs<'_>) -> ScanResult<()> {
    match specs.presentation {
        Presentation::None | Presentation::Character | Presentation::EscapedCharacter => Ok(()),
        _ => Err(ScanError::invalid_format_string(
            "invalid type specifier for character argument",
        )),
    }
}

fn check_string(specs: &FormatSpecs<'_>) -> ScanResult<()> {
    match specs.presentation {
        Presentation::None
        | Presentation::String
        | Presentation::CharSet
        | Presentation::Regex
        | Presentation::RegexEscaped => Ok(()),
        Presentation::Character => {
            if specs.width == 0 {
                return Err(ScanError::invalid_format_string(
                    "'c' type specifier for strings requires a field width",
                ));
            }
            Ok(())
        }
        _ => Err(ScanError::invalid_format_string(
            "invalid type specifier for string argument",
        )),
    }
}

fn check_pointer(specs: &FormatSpecs<'_>) -> ScanResult<()> {
    match specs.presentation {
        Presentation::None | Presentation::Pointer => Ok(()),
        _ => Err(ScanError::invalid_format_string(
            "invalid type specifier for pointer argument",
        )),
    }
}
