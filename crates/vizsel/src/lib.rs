//! # vizsel
//!
//! Selection-to-signal compiler for layered, concatenated, repeated and
//! faceted view specs.
//!
//! This crate is a facade that re-exports functionality from:
//! - `vizsel-ast` - view tree, selection, scale and signal types
//! - `vizsel-resolve` - normalization, selection parsing, signal assembly,
//!   scale domain resolution
//!
//! ## Architecture
//!
//! ```text
//! vizsel-ast      - data model + wire shapes
//!     ↓
//! vizsel-resolve  - passes + diagnostics
//!     ↓
//! vizsel (facade) - re-exports + compile API
//! ```
//!
//! ## Usage
//!
//! ```
//! let output = vizsel::compile(r#"{
//!     "mark": "point",
//!     "selection": {"grid": {"type": "interval", "bind": "scales"}},
//!     "encoding": {
//!         "x": {"field": "Horsepower", "type": "quantitative"},
//!         "y": {"field": "Miles_per_Gallon", "type": "quantitative"}
//!     }
//! }"#).unwrap();
//!
//! let x = output.compiled.scales().next().unwrap();
//! assert_eq!(x.domain_raw_signal(), Some(r#"grid["Horsepower"]"#));
//! assert!(output.warnings.is_empty());
//! ```

// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Re-export AST and foundation types
pub use vizsel_ast::{self as ast, *};

// Re-export passes
pub use vizsel_resolve as resolve;
pub use vizsel_resolve::{
    format_warnings, Compilation, CompileError, CompileWarning, Diagnostics, TopLevelSignals,
    WarningCode,
};

pub mod compile;
pub mod error;

pub use compile::{compile, compile_file, compile_spec, compile_value, CompileOutput};
pub use error::Error;

/// Compiler version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
