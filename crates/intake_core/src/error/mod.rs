//! Error taxonomy for scanning operations.
//!
//! Every fallible operation in the workspace returns [`ScanResult`], a plain
//! `Result` over [`ScanError`]. An error is a flat [`ErrorCode`] plus an
//! optional static message; there is no `good` variant because success is the
//! `Ok` arm of the result.
//!
//! The driver keeps the *first* error it sees and stops; errors are never
//! accumulated or silently skipped.

/// Result alias used throughout the workspace.
pub type ScanResult<T> = Result<T, ScanError>;

/// What went wrong during a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorCode {
    /// The source ran out before a required read completed.
    #[error("end of input")]
    EndOfInput,
    /// Source content did not match what the field's specification demanded.
    #[error("invalid scanned value")]
    InvalidScannedValue,
    /// A literal in the format string did not match the source.
    #[error("invalid literal")]
    InvalidLiteral,
    /// Fill characters expected by the field's fill/align were not present.
    #[error("invalid fill")]
    InvalidFill,
    /// A width-bounded read could not reach the required width.
    #[error("length too short")]
    LengthTooShort,
    /// Static or argument-dependent format-string error.
    #[error("invalid format string")]
    InvalidFormatString,
    /// Numeric result above the destination type's maximum.
    #[error("value out of range: positive overflow")]
    ValuePositiveOverflow,
    /// Numeric result below the destination type's minimum.
    #[error("value out of range: negative overflow")]
    ValueNegativeOverflow,
    /// The underlying source failed.
    #[error("I/O error")]
    IoError,
}

/// A scan failure: an [`ErrorCode`] with an optional static message.
///
/// `Copy` so readers can stash a pending error and try an alternative parse
/// without ceremony.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{code}{}", message_suffix(.msg))]
pub struct ScanError {
    code: ErrorCode,
    msg: Option<&'static str>,
}

fn message_suffix(msg: &Option<&'static str>) -> String {
    match msg {
        Some(m) => format!(": {m}"),
        None => String::new(),
    }
}

impl ScanError {
    /// Build an error from a bare code, without a message.
    pub const fn from_code(code: ErrorCode) -> Self {
        Self { code, msg: None }
    }

    /// Build an error from a code and a static message.
    pub const fn with_msg(code: ErrorCode, msg: &'static str) -> Self {
        Self {
            code,
            msg: Some(msg),
        }
    }

    /// The error code.
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// The optional static message.
    pub const fn msg(&self) -> Option<&'static str> {
        self.msg
    }

    /// Source ran out mid-read.
    #[cold]
    pub const fn end_of_input(msg: &'static str) -> Self {
        Self::with_msg(ErrorCode::EndOfInput, msg)
    }

    /// Source content did not match the field's specification.
    #[cold]
    pub const fn invalid_scanned_value(msg: &'static str) -> Self {
        Self::with_msg(ErrorCode::InvalidScannedValue, msg)
    }

    /// A format-string literal did not match the source.
    #[cold]
    pub const fn invalid_literal(msg: &'static str) -> Self {
        Self::with_msg(ErrorCode::InvalidLiteral, msg)
    }

    /// Expected fill characters were not present.
    #[cold]
    pub const fn invalid_fill(msg: &'static str) -> Self {
        Self::with_msg(ErrorCode::InvalidFill, msg)
    }

    /// A width-bounded read fell short of the required width.
    #[cold]
    pub const fn length_too_short(msg: &'static str) -> Self {
        Self::with_msg(ErrorCode::LengthTooShort, msg)
    }

    /// The format string is invalid, statically or for the matched argument.
    #[cold]
    pub const fn invalid_format_string(msg: &'static str) -> Self {
        Self::with_msg(ErrorCode::InvalidFormatString, msg)
    }

    /// Numeric value above the destination's maximum.
    #[cold]
    pub const fn value_positive_overflow(msg: &'static str) -> Self {
        Self::with_msg(ErrorCode::ValuePositiveOverflow, msg)
    }

    /// Numeric value below the destination's minimum.
    #[cold]
    pub const fn value_negative_overflow(msg: &'static str) -> Self {
        Self::with_msg(ErrorCode::ValueNegativeOverflow, msg)
    }

    /// The underlying source reported a failure.
    #[cold]
    pub const fn io_error(msg: &'static str) -> Self {
        Self::with_msg(ErrorCode::IoError, msg)
    }

    /// True when the error is recoverable by retrying with different input
    /// expectations (everything except I/O failures).
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self.code, ErrorCode::IoError)
    }
}
