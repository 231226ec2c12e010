//! Type-erased argument destinations.
//!
//! A scan call borrows each destination mutably and wraps it in a
//! [`ScanArg`]: a tagged variant the driver dispatches on. The ordered,
//! immutable collection of those handles is a [`ScanArgs`] store, indexable
//! by zero-based argument id.
//!
//! The [`Scannable`] trait is the bridge from a concrete `&mut T` to its
//! variant; the `scan!` macro calls it for every destination.

use intake_core::{ScanBuffer, ScanResult};
use intake_format::{ArgCategory, FormatSpecs};

use crate::locale::Locale;

/// User-defined scanning for types outside the built-in kinds.
pub trait CustomScan {
    /// Scan a value from the buffer's current position per `specs`.
    ///
    /// On failure the driver rewinds the buffer to the field start; the
    /// implementation does not need to restore the position itself.
    fn scan(
        &mut self,
        buffer: &mut ScanBuffer<'_>,
        specs: &FormatSpecs<'_>,
        locale: &Locale,
    ) -> ScanResult<()>;
}

/// Discriminant of a [`ScanArg`], without the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgKind {
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `bool`
    Bool,
    /// `char`
    Char,
    /// `&mut [u8]`, filled exactly
    Bytes,
    /// Owned `String`
    Str,
    /// `&str` view borrowing from the source
    StrView,
    /// `*const ()`, read as hexadecimal
    Ptr,
    /// User-provided scanner
    Custom,
}

/// A mutably borrowed scan destination.
///
/// `'d` is the destination borrow; `'s` is the source, which string views
/// borrow from.
pub enum ScanArg<'d, 's> {
    /// Signed 8-bit integer destination.
    I8(&'d mut i8),
    /// Signed 16-bit integer destination.
    I16(&'d mut i16),
    /// Signed 32-bit integer destination.
    I32(&'d mut i32),
    /// Signed 64-bit integer destination.
    I64(&'d mut i64),
    /// Pointer-sized signed integer destination.
    Isize(&'d mut isize),
    /// Unsigned 8-bit integer destination.
    U8(&'d mut u8),
    /// Unsigned 16-bit integer destination.
    U16(&'d mut u16),
    /// Unsigned 32-bit integer destination.
    U32(&'d mut u32),
    /// Unsigned 64-bit integer destination.
    U64(&'d mut u64),
    /// Pointer-sized unsigned integer destination.
    Usize(&'d mut usize),
    /// Single-precision float destination.
    F32(&'d mut f32),
    /// Double-precision float destination.
    F64(&'d mut f64),
    /// Boolean destination.
    Bool(&'d mut bool),
    /// Code-point destination.
    Char(&'d mut char),
    /// Raw code-unit buffer, filled to its exact length.
    Bytes(&'d mut [u8]),
    /// Owned string destination.
    Str(&'d mut String),
    /// Borrowed view destination; requires a contiguous source.
    StrView(&'d mut &'s str),
    /// Pointer destination, read as hexadecimal.
    Ptr(&'d mut *const ()),
    /// User-provided scanner.
    Custom(&'d mut dyn CustomScan),
}

impl ScanArg<'_, '_> {
    /// The argument's kind tag.
    pub fn kind(&self) -> ArgKind {
        match self {
            Self::I8(_) => ArgKind::I8,
            Self::I16(_) => ArgKind::I16,
            Self::I32(_) => ArgKind::I32,
            Self::I64(_) => ArgKind::I64,
            Self::Isize(_) => ArgKind::Isize,
            Self::U8(_) => ArgKind::U8,
            Self::U16(_) => ArgKind::U16,
            Self::U32(_) => ArgKind::U32,
            Self::U64(_) => ArgKind::U64,
            Self::Usize(_) => ArgKind::Usize,
            Self::F32(_) => ArgKind::F32,
            Self::F64(_) => ArgKind::F64,
            Self::Bool(_) => ArgKind::Bool,
            Self::Char(_) => ArgKind::Char,
            Self::Bytes(_) => ArgKind::Bytes,
            Self::Str(_) => ArgKind::Str,
            Self::StrView(_) => ArgKind::StrView,
            Self::Ptr(_) => ArgKind::Ptr,
            Self::Custom(_) => ArgKind::Custom,
        }
    }

    /// The validation/dispatch category of this argument.
    pub fn category(&self) -> ArgCategory {
        match self.kind() {
            ArgKind::I8 | ArgKind::I16 | ArgKind::I32 | ArgKind::I64 | ArgKind::Isize => {
                ArgCategory::SignedInt
            }
            ArgKind::U8 | ArgKind::U16 | ArgKind::U32 | ArgKind::U64 | ArgKind::Usize => {
                ArgCategory::UnsignedInt
            }
            ArgKind::F32 | ArgKind::F64 => ArgCategory::Float,
            ArgKind::Bool => ArgCategory::Boolean,
            ArgKind::Char => ArgCategory::CodePoint,
            ArgKind::Bytes => ArgCategory::ByteBuffer,
            ArgKind::Str | ArgKind::StrView => ArgCategory::String,
            ArgKind::Ptr => ArgCategory::Pointer,
            ArgKind::Custom => ArgCategory::Custom,
        }
    }
}

/// Ordered, immutable store of scan destinations for one scan call.
pub struct ScanArgs<'d, 's> {
    args: Vec<ScanArg<'d, 's>>,
}

impl<'d, 's> ScanArgs<'d, 's> {
    /// Wrap an ordered destination list.
    pub fn new(args: Vec<ScanArg<'d, 's>>) -> Self {
        Self { args }
    }

    /// Number of destinations.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// True when there are no destinations.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The destination with the given zero-based id.
    pub fn get_mut(&mut self, id: usize) -> Option<&mut ScanArg<'d, 's>> {
        self.args.get_mut(id)
    }

    /// The category of the destination with the given id.
    pub fn category(&self, id: usize) -> Option<ArgCategory> {
        self.args.get(id).map(ScanArg::category)
    }
}

/// Types usable as scan destinations.
pub trait Scannable<'s> {
    /// Erase `&mut self` into a [`ScanArg`].
    fn as_scan_arg<'d>(&'d mut self) -> ScanArg<'d, 's>;
}

macro_rules! impl_scannable {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl<'s> Scannable<'s> for $ty {
            fn as_scan_arg<'d>(&'d mut self) -> ScanArg<'d, 's> {
                ScanArg::$variant(self)
            }
        }
    )*};
}

impl_scannable! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    char => Char,
    String => Str,
    *const () => Ptr,
}

impl<'s> Scannable<'s> for &'s str {
    fn as_scan_arg<'d>(&'d mut self) -> ScanArg<'d, 's> {
        ScanArg::StrView(self)
    }
}

impl<'s> Scannable<'s> for [u8] {
    fn as_scan_arg<'d>(&'d mut self) -> ScanArg<'d, 's> {
        ScanArg::Bytes(self)
    }
}
