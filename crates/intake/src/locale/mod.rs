//! Locale handle for localized scanning.
//!
//! The core never touches process-global locale state: a [`Locale`] is plain
//! data passed down to the readers. The default value mirrors the classic C
//! locale with en-US-style digit grouping; builders override individual
//! pieces.

/// Numeric and boolean localization parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locale {
    decimal_point: char,
    thousands_sep: char,
    /// Group sizes, least significant first; the last entry repeats.
    /// Empty means grouping is not checked.
    grouping: Vec<u8>,
    truename: String,
    falsename: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self::classic()
    }
}

impl Locale {
    /// Classic locale: `.` decimal point, `,` thousands separator, groups
    /// of three, `true`/`false`.
    pub fn classic() -> Self {
        Self {
            decimal_point: '.',
            thousands_sep: ',',
            grouping: vec![3],
            truename: "true".to_owned(),
            falsename: "false".to_owned(),
        }
    }

    /// Override the decimal point.
    #[must_use]
    pub fn with_decimal_point(mut self, cp: char) -> Self {
        self.decimal_point = cp;
        self
    }

    /// Override the thousands separator.
    #[must_use]
    pub fn with_thousands_sep(mut self, cp: char) -> Self {
        self.thousands_sep = cp;
        self
    }

    /// Override the grouping descriptor (least-significant group first).
    #[must_use]
    pub fn with_grouping(mut self, grouping: impl Into<Vec<u8>>) -> Self {
        self.grouping = grouping.into();
        self
    }

    /// Override the boolean names.
    #[must_use]
    pub fn with_names(mut self, truename: impl Into<String>, falsename: impl Into<String>) -> Self {
        self.truename = truename.into();
        self.falsename = falsename.into();
        self
    }

    /// The decimal point code point.
    pub fn decimal_point(&self) -> char {
        self.decimal_point
    }

    /// The thousands separator code point.
    pub fn thousands_sep(&self) -> char {
        self.thousands_sep
    }

    /// Group sizes, least significant first; the last entry repeats.
    pub fn grouping(&self) -> &[u8] {
        &self.grouping
    }

    /// The localized spelling of `true`.
    pub fn truename(&self) -> &str {
        &self.truename
    }

    /// The localized spelling of `false`.
    pub fn falsename(&self) -> &str {
        &self.falsename
    }

    /// Whitespace classification; locales do not currently override this.
    pub fn is_space(&self, cp: char) -> bool {
        cp.is_whitespace()
    }

    /// Decimal digit classification; locales do not currently override this.
    pub fn is_digit(&self, cp: char) -> bool {
        cp.is_ascii_digit()
    }
}
