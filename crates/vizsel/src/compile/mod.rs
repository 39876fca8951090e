use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use vizsel_ast::{CompiledSpec, ViewSpec};
use vizsel_resolve::{Compilation, CompileWarning, Diagnostics};

use crate::error::Error;

/// Result of a successful compile: the artifact plus every warning raised
/// while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileOutput {
    pub compiled: CompiledSpec,
    pub warnings: Vec<CompileWarning>,
}

/// Compiles a view spec from its JSON text.
///
/// # Parameters
/// - `source`: the JSON view spec.
///
/// # Errors
/// Returns [`Error::Json`] if the text is not a valid view spec and
/// [`Error::Compile`] for structural errors in the view tree or selections.
pub fn compile(source: &str) -> Result<CompileOutput, Error> {
    let spec: ViewSpec = serde_json::from_str(source)?;
    compile_spec(&spec)
}

/// Compiles a view spec given as a JSON value.
///
/// # Errors
/// See [`compile`].
pub fn compile_value(value: Value) -> Result<CompileOutput, Error> {
    let spec: ViewSpec = serde_json::from_value(value)?;
    compile_spec(&spec)
}

/// Compiles an already deserialized view spec.
///
/// A fresh [`Diagnostics`] collector is created for this invocation and
/// drained into the output.
///
/// # Errors
/// Returns [`Error::Compile`] for structural errors.
pub fn compile_spec(spec: &ViewSpec) -> Result<CompileOutput, Error> {
    let mut diagnostics = Diagnostics::new();
    let compilation = Compilation::from_spec(spec, &mut diagnostics)?;
    let compiled = compilation.assemble(&mut diagnostics);
    debug!(
        signals = compiled.signals.len(),
        views = compiled.views.len(),
        "compiled view spec"
    );
    Ok(CompileOutput {
        compiled,
        warnings: diagnostics.into_warnings(),
    })
}

/// Reads and compiles a view spec file.
///
/// # Parameters
/// - `path`: Path to a JSON view spec.
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read, otherwise see
/// [`compile`].
pub fn compile_file(path: &Path) -> Result<CompileOutput, Error> {
    info!(path = %path.display(), "compiling view spec");
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile(&source)
}
