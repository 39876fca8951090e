//! Field references and expression-string helpers.
//!
//! Field names arrive from the view spec as opaque strings. A dotted name such
//! as `nested.b` is kept verbatim wherever it names something (signal names,
//! object-literal keys, `domainRaw` accessors). Only datum access splits it
//! into segments, because the rendered data really is nested.
//!
//! ```
//! # use vizsel_ast::foundation::FieldPath;
//! let field = FieldPath::from("nested.b");
//! assert_eq!(field.as_str(), "nested.b");
//! assert_eq!(field.segments(), vec!["nested", "b"]);
//! assert_eq!(field.datum_access("datum"), r#"datum["nested"] && datum["nested"]["b"]"#);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A data field name, stored exactly as declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath {
    raw: String,
}

impl FieldPath {
    /// Wrap a field name without interpreting it.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The verbatim field name.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Nested segments, splitting on `.` unless escaped as `\.`.
    pub fn segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = self.raw.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'.') => {
                    current.push('.');
                    chars.next();
                }
                '.' => segments.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        segments.push(current);
        segments
    }

    /// Whether the name addresses a nested property.
    pub fn is_nested(&self) -> bool {
        self.segments().len() > 1
    }

    /// Guarded access expression for this field on `datum`.
    ///
    /// Every intermediate object is tested before it is indexed so that
    /// missing nested values evaluate to a falsy value instead of throwing.
    pub fn datum_access(&self, datum: &str) -> String {
        let mut prefix = datum.to_string();
        let mut guards = Vec::new();
        for segment in self.segments() {
            prefix = format!("{}[{}]", prefix, string_value(&segment));
            guards.push(prefix.clone());
        }
        guards.join(" && ")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<&str> for FieldPath {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

/// Quote a string the way the expression language expects string literals.
///
/// This is JSON string encoding, so the runtime and this compiler agree on
/// escapes byte for byte.
pub fn string_value(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}
