//! Ex command-line addresses and ranges.
//!
//! An Ex command is prefixed by an optional [`LineRange`] made of one or two
//! [`Address`]es: `:3,$d`, `:'a,'bw`, `:/start/;/end/y`. This crate parses
//! those prefixes and resolves them against an [`EditorContext`] into
//! concrete 0-based line numbers.
//!
//! [`EditorContext`]: vex_host::EditorContext

pub mod address;
pub mod range;

pub use address::{Address, LineSpecifier, Side};
pub use range::{LineRange, ResolvedRange, Separator};
