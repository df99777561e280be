//! Expression AST for the vex engine.
//!
//! The parser produces these nodes; the evaluator consumes them. Nodes carry
//! no source spans — expressions are short, single-line strings typed at the
//! command line, and errors point at the command as a whole.

mod ast;
pub mod numeric;
mod ops;

pub use ast::{Expression, Namespace, OptionScope};
pub use ops::{BinaryOp, ComparisonOp, UnaryOp};
