// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Selection and scale passes for the vizsel compiler
//!
//! This crate normalizes a raw view spec into a view tree, parses scales and
//! selections against it, and assembles the signals and scales handed to the
//! reactive runtime.

pub mod diagnostics;
pub mod error;
pub mod resolve;

pub use diagnostics::{format_warnings, CompileWarning, Diagnostics, WarningCode};
pub use error::{CompileError, Result};
pub use resolve::*;
