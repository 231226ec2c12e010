//! Boolean reader: numeric (`0`/`1`) and textual (`true`/`false` or the
//! locale's names) forms.
//!
//! The numeric form is tried first when enabled. An `s` presentation
//! restricts to textual, a numeric presentation restricts to numeric, and
//! the `L` flag switches the textual names to the locale's.

use intake_core::{ScanBuffer, ScanError, ScanResult};
use intake_format::{FormatSpecs, Presentation};

use crate::locale::Locale;
use crate::readers::{eat_byte, eat_exact};

/// Which boolean forms a field accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BoolOptions {
    pub allow_text: bool,
    pub allow_numeric: bool,
    pub use_locale_names: bool,
}

impl BoolOptions {
    /// Derive the accepted forms from the field's specs.
    ///
    /// Localization implies textual mode.
    pub(crate) fn from_specs(specs: &FormatSpecs<'_>) -> Self {
        let mut options = match specs.presentation {
            Presentation::String => Self {
                allow_text: true,
                allow_numeric: false,
                use_locale_names: false,
            },
            Presentation::None => Self {
                allow_text: true,
                allow_numeric: true,
                use_locale_names: false,
            },
            // Validation has restricted the rest to the numeric set.
            _ => Self {
                allow_text: false,
                allow_numeric: true,
                use_locale_names: false,
            },
        };
        if specs.localized {
            options.allow_text = true;
            options.use_locale_names = true;
        }
        options
    }
}

/// Read a boolean at the buffer's current position.
pub(crate) fn read_bool(
    buffer: &mut ScanBuffer<'_>,
    specs: &FormatSpecs<'_>,
    locale: &Locale,
) -> ScanResult<bool> {
    let options = BoolOptions::from_specs(specs);

    if options.allow_numeric {
        if eat_byte(buffer, b'0')? {
            return Ok(false);
        }
        if eat_byte(buffer, b'1')? {
            return Ok(true);
        }
    }

    if options.allow_text {
        let (truename, falsename) = if options.use_locale_names {
            (locale.truename(), locale.falsename())
        } else {
            ("true", "false")
        };
        if eat_exact(buffer, truename)? {
            return Ok(true);
        }
        if eat_exact(buffer, falsename)? {
            return Ok(false);
        }
    }

    Err(crate::readers::fail_empty(
        buffer,
        ScanError::invalid_scanned_value("failed to read boolean"),
    ))
}

#[cfg(test)]
mod tests;
