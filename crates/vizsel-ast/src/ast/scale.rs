//! Scale domains, scale components and the assembled scale shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::view::ViewId;
use crate::foundation::{Channel, FieldPath, ScaleType};

/// Name of the data source data-driven domains read from.
pub const DATA_SOURCE: &str = "source_0";

/// Whether a composite view merges a channel's scale across its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveMode {
    Shared,
    Independent,
}

/// A domain that reads its extent from a selection.
///
/// At most one of `field` / `encoding` is consulted; `field` wins when both
/// are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionDomain {
    pub selection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Channel>,
}

impl SelectionDomain {
    pub fn new(selection: impl Into<String>) -> Self {
        Self {
            selection: selection.into(),
            field: None,
            encoding: None,
        }
    }
}

/// Declared domain of a scale.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ScaleDomain {
    /// Derived from the encoded fields.
    #[default]
    Data,
    Literal(Vec<Value>),
    Selection(SelectionDomain),
}

impl ScaleDomain {
    pub fn is_data(&self) -> bool {
        matches!(self, ScaleDomain::Data)
    }
}

/// `{signal: "<expr>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRef {
    pub signal: String,
}

impl SignalRef {
    pub fn new(signal: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
        }
    }
}

/// A parsed scale, owned by the view its resolution placed it on.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleComponent {
    pub name: String,
    pub channel: Channel,
    pub scale_type: ScaleType,
    pub domain: ScaleDomain,
    /// Encoded fields feeding a data-driven domain, in first-seen order.
    pub fields: Vec<FieldPath>,
    pub owner: ViewId,
    /// Set by a `bind: scales` selection.
    pub binding: Option<SignalRef>,
}

/// Data reference of an assembled domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataRef {
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Assembled domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VgDomain {
    Literal(Vec<Value>),
    Data(DataRef),
}

/// Assembled scale handed to the runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VgScale {
    pub name: String,
    #[serde(rename = "type")]
    pub scale_type: ScaleType,
    pub domain: VgDomain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_raw: Option<SignalRef>,
}

impl VgScale {
    /// The `domainRaw.signal` expression, if any.
    pub fn domain_raw_signal(&self) -> Option<&str> {
        self.domain_raw.as_ref().map(|raw| raw.signal.as_str())
    }
}
