//! Runtime values for the vex expression engine.
//!
//! Seven types: Number (i64), Float, String, List, Dictionary, Funcref, and
//! Blob. Containers have reference semantics through [`Shared`] handles;
//! the `is` operator compares those handles by identity.

mod convert;
mod display;
mod shared;
mod value;

pub use display::format_float;
pub use shared::Shared;
pub use value::{FuncrefData, FuncrefKind, LambdaBody, Value};
