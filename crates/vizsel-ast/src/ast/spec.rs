//! Raw view specification as deserialized from JSON.
//!
//! These types mirror the input grammar closely and are deliberately loose:
//! unknown properties (data, transforms, sizes, ...) are ignored. The
//! normalization pass turns a [`ViewSpec`] into a [`ViewTree`](super::ViewTree).

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::scale::{ResolveMode, SelectionDomain};
use super::selection::{SelectionConfig, SelectionDef};
use crate::foundation::{Channel, FieldType, Mark, ScaleType};

/// One view of the input spec; composition is expressed by which of the
/// composition properties is present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mark: Option<MarkSpec>,
    #[serde(default)]
    pub encoding: IndexMap<Channel, ChannelSpec>,
    #[serde(default)]
    pub selection: IndexMap<String, SelectionDef>,
    #[serde(default)]
    pub layer: Option<Vec<ViewSpec>>,
    #[serde(default)]
    pub hconcat: Option<Vec<ViewSpec>>,
    #[serde(default)]
    pub vconcat: Option<Vec<ViewSpec>>,
    #[serde(default)]
    pub concat: Option<Vec<ViewSpec>>,
    #[serde(default)]
    pub repeat: Option<RepeatSpec>,
    #[serde(default)]
    pub facet: Option<FacetSpec>,
    #[serde(default)]
    pub spec: Option<Box<ViewSpec>>,
    #[serde(default)]
    pub resolve: ResolveSpec,
    /// Only read on the top-level view.
    #[serde(default)]
    pub config: Option<ConfigSpec>,
}

/// `mark: "point"` or `mark: {type: "point", ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MarkSpec {
    Type(Mark),
    Def {
        #[serde(rename = "type")]
        mark: Mark,
    },
}

impl MarkSpec {
    pub fn mark(&self) -> Mark {
        match self {
            MarkSpec::Type(mark) | MarkSpec::Def { mark } => *mark,
        }
    }
}

/// Value of one `encoding` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChannelSpec {
    /// Multi-field channels such as `tooltip: [...]`; carry no scale.
    List(Vec<Value>),
    Field(FieldDefSpec),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefSpec {
    #[serde(default)]
    pub field: Option<FieldSpec>,
    #[serde(default, rename = "type")]
    pub field_type: Option<FieldType>,
    #[serde(default)]
    pub bin: Option<Value>,
    #[serde(default)]
    pub scale: Option<ScaleSpec>,
}

impl FieldDefSpec {
    /// `bin: true` or a bin parameter object.
    pub fn is_binned(&self) -> bool {
        match &self.bin {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(_) => true,
        }
    }
}

/// `field: "name"` or `field: {repeat: "row"}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldSpec {
    Name(String),
    Repeat { repeat: RepeatRef },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatRef {
    Row,
    Column,
}

impl RepeatRef {
    pub fn as_str(self) -> &'static str {
        match self {
            RepeatRef::Row => "row",
            RepeatRef::Column => "column",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScaleSpec {
    #[serde(default, rename = "type")]
    pub scale_type: Option<ScaleType>,
    #[serde(default)]
    pub domain: Option<DomainSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DomainSpec {
    Literal(Vec<Value>),
    Selection(SelectionDomain),
    /// `"unaggregated"` and other keyword domains; treated as data-driven.
    Keyword(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepeatSpec {
    #[serde(default)]
    pub row: Option<Vec<String>>,
    #[serde(default)]
    pub column: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacetSpec {
    #[serde(default)]
    pub row: Option<FieldDefSpec>,
    #[serde(default)]
    pub column: Option<FieldDefSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveSpec {
    #[serde(default)]
    pub scale: IndexMap<Channel, ResolveMode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigSpec {
    #[serde(default)]
    pub selection: SelectionConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unit_spec() {
        let spec: ViewSpec = serde_json::from_value(json!({
            "data": {"url": "data/cars.json"},
            "mark": "point",
            "selection": {"grid": {"type": "interval", "bind": "scales"}},
            "encoding": {
                "x": {"field": "Horsepower", "type": "quantitative"},
                "tooltip": [{"field": "Name"}, {"field": "Origin"}]
            }
        }))
        .unwrap();
        assert_eq!(spec.mark.unwrap().mark(), Mark::Point);
        assert!(spec.selection.contains_key("grid"));
        assert!(matches!(spec.encoding[&Channel::Tooltip], ChannelSpec::List(_)));
        match &spec.encoding[&Channel::X] {
            ChannelSpec::Field(def) => {
                assert_eq!(def.field, Some(FieldSpec::Name("Horsepower".into())));
                assert_eq!(def.field_type, Some(FieldType::Quantitative));
            }
            other => panic!("unexpected channel spec {:?}", other),
        }
    }

    #[test]
    fn test_repeat_field_reference() {
        let def: FieldDefSpec =
            serde_json::from_value(json!({"field": {"repeat": "column"}, "type": "quantitative"}))
                .unwrap();
        assert_eq!(
            def.field,
            Some(FieldSpec::Repeat {
                repeat: RepeatRef::Column
            })
        );
    }

    #[test]
    fn test_domain_forms() {
        let selection: DomainSpec =
            serde_json::from_value(json!({"selection": "brush", "field": "nested.a"})).unwrap();
        assert!(matches!(selection, DomainSpec::Selection(_)));

        let literal: DomainSpec = serde_json::from_value(json!([0, 100])).unwrap();
        assert!(matches!(literal, DomainSpec::Literal(_)));

        let keyword: DomainSpec = serde_json::from_value(json!("unaggregated")).unwrap();
        assert!(matches!(keyword, DomainSpec::Keyword(_)));
    }

    #[test]
    fn test_bin_detection() {
        let binned: FieldDefSpec = serde_json::from_value(json!({"bin": {"maxbins": 10}})).unwrap();
        assert!(binned.is_binned());
        let plain: FieldDefSpec = serde_json::from_value(json!({"bin": false})).unwrap();
        assert!(!plain.is_binned());
    }

    #[test]
    fn test_unknown_channel_is_an_error() {
        let result: Result<ViewSpec, _> = serde_json::from_value(json!({
            "mark": "point",
            "encoding": {"latitude": {"field": "lat"}}
        }));
        assert!(result.is_err());
    }
}
