//! Selection declarations and parsed selection components.
//!
//! A [`SelectionDef`] is what the user wrote on a unit view. After config
//! defaults are applied and projections are resolved against the unit's
//! encodings it becomes a [`SelectionComponent`], the canonical form every
//! later pass reads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::view::ViewId;
use crate::foundation::{Channel, FieldPath};

/// Kind of interaction a selection captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionType {
    Single,
    Multi,
    Interval,
}

impl SelectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionType::Single => "single",
            SelectionType::Multi => "multi",
            SelectionType::Interval => "interval",
        }
    }
}

/// How selection state is shared across the unit views that declare it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionResolution {
    #[default]
    Global,
    Union,
    Intersect,
}

/// The `"scales"` keyword of a `bind` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalesKeyword {
    #[serde(rename = "scales")]
    Scales,
}

/// Raw `bind` property: either `"scales"` or a widget specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindSpec {
    Scales(ScalesKeyword),
    Widget(Map<String, Value>),
}

/// A selection as declared on a unit view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDef {
    #[serde(rename = "type")]
    pub selection_type: SelectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encodings: Option<Vec<Channel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldPath>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolve: Option<SelectionResolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<BindSpec>,
}

impl SelectionDef {
    /// Declaration of the given type with nothing else set.
    pub fn new(selection_type: SelectionType) -> Self {
        Self {
            selection_type,
            on: None,
            encodings: None,
            fields: None,
            resolve: None,
            bind: None,
        }
    }

    /// Fill unset properties from `defaults`.
    ///
    /// `encodings` and `fields` are taken together: a declaration that names
    /// either one keeps its own projection list untouched.
    pub fn with_defaults(&self, defaults: &SelectionDefaults) -> SelectionDef {
        let declares_projection = self.encodings.is_some() || self.fields.is_some();
        SelectionDef {
            selection_type: self.selection_type,
            on: self.on.clone().or_else(|| defaults.on.clone()),
            encodings: if declares_projection {
                self.encodings.clone()
            } else {
                defaults.encodings.clone()
            },
            fields: if declares_projection {
                self.fields.clone()
            } else {
                defaults.fields.clone()
            },
            resolve: self.resolve.or(defaults.resolve),
            bind: self.bind.clone().or_else(|| defaults.bind.clone()),
        }
    }

    pub fn is_scale_bound(&self) -> bool {
        matches!(self.bind, Some(BindSpec::Scales(_)))
    }
}

/// Per-type defaults a config block can supply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionDefaults {
    #[serde(default)]
    pub on: Option<String>,
    #[serde(default)]
    pub encodings: Option<Vec<Channel>>,
    #[serde(default)]
    pub fields: Option<Vec<FieldPath>>,
    #[serde(default)]
    pub resolve: Option<SelectionResolution>,
    #[serde(default)]
    pub bind: Option<BindSpec>,
}

/// `config.selection`: user defaults layered over the built-in ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub single: SelectionDefaults,
    #[serde(default)]
    pub multi: SelectionDefaults,
    #[serde(default)]
    pub interval: SelectionDefaults,
}

/// Default event stream of interval selections: drag with the primary button.
pub const INTERVAL_EVENTS: &str = "[mousedown, window:mouseup] > window:mousemove!";
/// Default event stream of point selections.
pub const POINT_EVENTS: &str = "click";

impl SelectionConfig {
    /// The defaults used when no config block overrides them.
    pub fn builtin() -> Self {
        let point = SelectionDefaults {
            on: Some(POINT_EVENTS.into()),
            resolve: Some(SelectionResolution::Global),
            ..SelectionDefaults::default()
        };
        Self {
            single: point.clone(),
            multi: point,
            interval: SelectionDefaults {
                on: Some(INTERVAL_EVENTS.into()),
                encodings: Some(vec![Channel::X, Channel::Y]),
                resolve: Some(SelectionResolution::Global),
                ..SelectionDefaults::default()
            },
        }
    }

    pub fn defaults_for(&self, selection_type: SelectionType) -> &SelectionDefaults {
        match selection_type {
            SelectionType::Single => &self.single,
            SelectionType::Multi => &self.multi,
            SelectionType::Interval => &self.interval,
        }
    }

    /// Apply this config, then the built-in defaults, to a declaration.
    pub fn apply(&self, def: &SelectionDef) -> SelectionDef {
        let builtin = Self::builtin();
        def.with_defaults(self.defaults_for(def.selection_type))
            .with_defaults(builtin.defaults_for(def.selection_type))
    }
}

/// Resolved `bind` of a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bind {
    #[default]
    None,
    Scales,
    Widget(Map<String, Value>),
}

impl From<Option<&BindSpec>> for Bind {
    fn from(spec: Option<&BindSpec>) -> Self {
        match spec {
            None => Bind::None,
            Some(BindSpec::Scales(_)) => Bind::Scales,
            Some(BindSpec::Widget(widget)) => Bind::Widget(widget.clone()),
        }
    }
}

/// One `(channel, field)` pair a selection captures state for.
///
/// Projections declared through `fields` carry no channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub channel: Option<Channel>,
    pub field: FieldPath,
}

/// Canonical form of a selection on one unit view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionComponent {
    pub name: String,
    pub selection_type: SelectionType,
    pub resolve: SelectionResolution,
    pub bind: Bind,
    /// Event stream that triggers the selection.
    pub events: String,
    /// Declaration order, never empty.
    pub projections: Vec<Projection>,
    /// Channels whose scale domains this selection drives.
    pub scales: Vec<Channel>,
    /// Bound channel signals are owned by the top level and only pushed to.
    pub push_outer: bool,
    /// The unit view that declared this occurrence.
    #[serde(skip)]
    pub unit: ViewId,
}

impl SelectionComponent {
    pub fn projection_for_channel(&self, channel: Channel) -> Option<&Projection> {
        self.projections.iter().find(|p| p.channel == Some(channel))
    }

    pub fn is_bound_to(&self, channel: Channel) -> bool {
        self.scales.contains(&channel)
    }

    /// Whether a projection's data signal is pushed to the outer scope.
    pub fn pushes(&self, projection: &Projection) -> bool {
        self.push_outer && projection.channel.is_some_and(|c| self.is_bound_to(c))
    }
}
