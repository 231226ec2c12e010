//! Type-safe scanning of formatted input: the read-side dual of formatted
//! printing.
//!
//! A format string with `{…}` replacement fields describes what the input
//! looks like; the scan parses the source into typed destinations and
//! reports how far it consumed:
//!
//! ```
//! let mut answer = 0i32;
//! let mut word = String::new();
//! let consumed = intake::scan!("42 towel", "{} {}", answer, word);
//! assert_eq!(consumed, Ok(8));
//! assert_eq!(answer, 42);
//! assert_eq!(word, "towel");
//! ```
//!
//! Borrowed views avoid the copy when the source is contiguous:
//!
//! ```
//! let source = String::from("foo bar");
//! let mut view: &str = "";
//! intake::scan!(&source, "{}", view).unwrap();
//! assert_eq!(view, "foo");
//! ```
//!
//! The macros capture destinations; [`vscan`] is the type-erased core they
//! call, usable directly with a [`ScanBuffer`] over a string, a code-unit
//! iterator, or any `BufRead` stream. [`input!`] scans process standard
//! input, holding its lock for the duration of the scan.

pub mod args;
mod driver;
pub mod locale;
mod readers;

pub use intake_core::width::WidthAlgorithm;
pub use intake_core::{ErrorCode, ScanBuffer, ScanError, ScanResult};
pub use intake_format::{
    Align, ArgCategory, Fill, FormatEvent, FormatParser, FormatSpecs, Presentation, RegexFlags,
};

pub use args::{ArgKind, CustomScan, ScanArg, ScanArgs, Scannable};
pub use locale::Locale;

/// Scan `buffer` per `format` into the type-erased `args`.
///
/// Returns the number of code units consumed. On failure the buffer is
/// positioned at the failing field's start (or the point of divergence for
/// literal mismatches), so a caller owning the buffer can retry with a
/// different format.
pub fn vscan<'s>(
    buffer: &mut ScanBuffer<'s>,
    format: &str,
    args: &mut ScanArgs<'_, 's>,
) -> ScanResult<usize> {
    driver::run(buffer, format, args, &Locale::classic())
}

/// [`vscan`] with an explicit locale controlling the decimal point,
/// thousands grouping, and boolean names of `L`-flagged fields.
pub fn vscan_localized<'s>(
    locale: &Locale,
    buffer: &mut ScanBuffer<'s>,
    format: &str,
    args: &mut ScanArgs<'_, 's>,
) -> ScanResult<usize> {
    driver::run(buffer, format, args, locale)
}

/// Scan a single default-formatted value off the front of `source`.
///
/// ```
/// let (consumed, value) = intake::scan_value::<i64>("1337 rest").unwrap();
/// assert_eq!((consumed, value), (4, 1337));
/// ```
pub fn scan_value<'s, T>(source: &'s str) -> ScanResult<(usize, T)>
where
    T: Scannable<'s> + Default,
{
    let mut value = T::default();
    let mut buffer = ScanBuffer::from_str(source);
    {
        let mut scan_args = ScanArgs::new(vec![value.as_scan_arg()]);
        vscan(&mut buffer, "{}", &mut scan_args)?;
    }
    Ok((buffer.position(), value))
}

/// Scan a string source into the given destinations.
///
/// Expands to a [`vscan`] call over a contiguous buffer; returns
/// `ScanResult<usize>` with the consumed length.
#[macro_export]
macro_rules! scan {
    ($source:expr, $format:expr $(, $dest:expr)* $(,)?) => {{
        let mut __buffer = $crate::ScanBuffer::from_str($source);
        let mut __args = $crate::ScanArgs::new(::std::vec![
            $($crate::Scannable::as_scan_arg(&mut $dest)),*
        ]);
        $crate::vscan(&mut __buffer, $format, &mut __args)
    }};
}

/// [`scan!`] with an explicit locale for `L`-flagged fields.
#[macro_export]
macro_rules! scan_localized {
    ($locale:expr, $source:expr, $format:expr $(, $dest:expr)* $(,)?) => {{
        let mut __buffer = $crate::ScanBuffer::from_str($source);
        let mut __args = $crate::ScanArgs::new(::std::vec![
            $($crate::Scannable::as_scan_arg(&mut $dest)),*
        ]);
        $crate::vscan_localized($locale, &mut __buffer, $format, &mut __args)
    }};
}

/// Scan process standard input.
///
/// Locks stdin for the whole scan; unconsumed buffered input stays in the
/// stdin buffer for the next read. Do not nest with another stdin reader on
/// the same thread.
#[macro_export]
macro_rules! input {
    ($format:expr $(, $dest:expr)* $(,)?) => {{
        let __stdin = ::std::io::stdin();
        let __lock = __stdin.lock();
        let mut __buffer = $crate::ScanBuffer::from_reader(__lock);
        let mut __args = $crate::ScanArgs::new(::std::vec![
            $($crate::Scannable::as_scan_arg(&mut $dest)),*
        ]);
        $crate::vscan(&mut __buffer, $format, &mut __args)
    }};
}

/// Print a prompt to stdout, flush it, then behave as [`input!`].
#[macro_export]
macro_rules! prompt {
    ($message:expr, $format:expr $(, $dest:expr)* $(,)?) => {{
        {
            use ::std::io::Write as _;
            ::std::print!("{}", $message);
            let _ = ::std::io::stdout().flush();
        }
        $crate::input!($format $(, $dest)*)
    }};
}
