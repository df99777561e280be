//! The Vimscript expression evaluator.
//!
//! [`EvaluationContext`] holds the mutable interpreter state (globals, local
//! scopes, `v:errors`) and evaluates parsed expressions against an
//! [`EditorContext`](vex_host::EditorContext), which supplies the cursor,
//! marks, registers, and settings that `v:` variables and builtins read.

mod builtins;
mod context;
mod ops;

pub use context::{evaluate_option, EvaluationContext, Variable, VariableStore};

#[cfg(test)]
mod tests;
