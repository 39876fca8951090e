// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST types for the vizsel selection compiler
//!
//! This crate holds the view tree, selection and scale types, the signal
//! shapes handed to the runtime, and the foundation types they are built
//! from. Passes live in `vizsel-resolve`.

pub mod ast;
pub mod foundation;

// Re-export commonly used types
pub use foundation::{string_value, Channel, FieldPath, FieldType, Mark, ScaleType};

pub use ast::*;
