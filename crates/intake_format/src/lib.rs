//! Format-string parsing for the intake scanning engine.
//!
//! A format string is consumed exactly once, producing a stream of
//! [`FormatEvent`]s: literal runs, whitespace runs, and replacement fields
//! carrying a fully parsed [`FormatSpecs`]. The parser allocates nothing and
//! borrows every emitted slice from the format string itself.
//!
//! Spec validation against the matched argument's kind lives in
//! [`validate`], keyed on [`ArgCategory`] — the parser itself has no
//! knowledge of argument types.

mod parser;
mod specs;
pub mod validate;

pub use parser::{FormatEvent, FormatParser};
pub use specs::{Align, Fill, FormatSpecs, Presentation, RegexFlags};
pub use validate::ArgCategory;
