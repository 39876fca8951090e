//! The view tree: an arena of unit and composite views.
//!
//! Every node has exactly one parent (except the root) and children are kept
//! in declared order. Passes never mutate the tree; they attach their results
//! in side tables keyed by [`ViewId`].

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::scale::{ResolveMode, ScaleDomain};
use super::selection::SelectionDef;
use crate::foundation::{Channel, FieldPath, FieldType, Mark, ScaleType};

/// Index of a view in its [`ViewTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct ViewId(pub u32);

impl ViewId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Field encoded on one channel of a unit view.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub field: Option<FieldPath>,
    pub field_type: FieldType,
    pub binned: bool,
    /// Explicit `scale.type`.
    pub scale_type: Option<ScaleType>,
    pub domain: ScaleDomain,
}

impl FieldDef {
    pub fn new(field: impl Into<FieldPath>, field_type: FieldType) -> Self {
        Self {
            field: Some(field.into()),
            field_type,
            binned: false,
            scale_type: None,
            domain: ScaleDomain::Data,
        }
    }
}

/// Values a repeated instance substitutes for `{repeat: "row" | "column"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repeater {
    pub row: Option<String>,
    pub column: Option<String>,
}

impl Repeater {
    /// Row and column repeat the same field.
    pub fn is_diagonal(&self) -> bool {
        matches!((&self.row, &self.column), (Some(r), Some(c)) if r == c)
    }
}

/// A leaf view drawing one mark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitView {
    pub mark: Mark,
    pub encoding: IndexMap<Channel, FieldDef>,
    pub selections: IndexMap<String, SelectionDef>,
    /// Set on instances of a repeat template (and views nested in them).
    pub repeater: Option<Repeater>,
}

impl UnitView {
    pub fn field(&self, channel: Channel) -> Option<&FieldPath> {
        self.encoding.get(&channel).and_then(|def| def.field.as_ref())
    }
}

/// How a composite view arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeKind {
    Layer,
    Concat,
    Repeat,
    Facet,
}

impl CompositeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CompositeKind::Layer => "layer",
            CompositeKind::Concat => "concat",
            CompositeKind::Repeat => "repeat",
            CompositeKind::Facet => "facet",
        }
    }

    /// Scale resolution when the spec does not say.
    pub fn default_scale_resolve(self, channel: Channel) -> ResolveMode {
        match self {
            CompositeKind::Layer | CompositeKind::Facet => ResolveMode::Shared,
            CompositeKind::Concat | CompositeKind::Repeat if channel.is_xy() => {
                ResolveMode::Independent
            }
            CompositeKind::Concat | CompositeKind::Repeat => ResolveMode::Shared,
        }
    }
}

/// A view that composes child views.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeView {
    pub kind: CompositeKind,
    /// Explicit `resolve.scale` entries.
    pub scale_resolve: IndexMap<Channel, ResolveMode>,
}

impl CompositeView {
    pub fn new(kind: CompositeKind) -> Self {
        Self {
            kind,
            scale_resolve: IndexMap::new(),
        }
    }

    pub fn scale_resolve(&self, channel: Channel) -> ResolveMode {
        self.scale_resolve
            .get(&channel)
            .copied()
            .unwrap_or_else(|| self.kind.default_scale_resolve(channel))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewKind {
    Unit(UnitView),
    Composite(CompositeView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewNode {
    pub id: ViewId,
    pub name: String,
    pub parent: Option<ViewId>,
    pub children: Vec<ViewId>,
    pub kind: ViewKind,
}

impl ViewNode {
    pub fn as_unit(&self) -> Option<&UnitView> {
        match &self.kind {
            ViewKind::Unit(unit) => Some(unit),
            ViewKind::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeView> {
        match &self.kind {
            ViewKind::Composite(composite) => Some(composite),
            ViewKind::Unit(_) => None,
        }
    }

    /// `"unit"` or the composite kind.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ViewKind::Unit(_) => "unit",
            ViewKind::Composite(composite) => composite.kind.as_str(),
        }
    }
}

/// Arena of views. The first node added is the root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewTree {
    nodes: Vec<ViewNode>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or as the root) and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not in the tree or a second root is added.
    pub fn add(&mut self, name: impl Into<String>, parent: Option<ViewId>, kind: ViewKind) -> ViewId {
        let id = ViewId(self.nodes.len() as u32);
        match parent {
            Some(parent) => self.nodes[parent.index()].children.push(id),
            None => assert!(self.nodes.is_empty(), "view tree already has a root"),
        }
        self.nodes.push(ViewNode {
            id,
            name: name.into(),
            parent,
            children: Vec::new(),
            kind,
        });
        id
    }

    pub fn root(&self) -> ViewId {
        ViewId(0)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(id.index())
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: ViewId) -> &ViewNode {
        &self.nodes[id.index()]
    }

    pub fn name(&self, id: ViewId) -> &str {
        &self.node(id).name
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.node(id).parent
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        &self.node(id).children
    }

    /// The `index`-th child of `id`, in declared order.
    pub fn child(&self, id: ViewId, index: usize) -> Option<ViewId> {
        self.children(id).get(index).copied()
    }

    pub fn unit(&self, id: ViewId) -> Option<&UnitView> {
        self.get(id).and_then(ViewNode::as_unit)
    }

    pub fn find(&self, name: &str) -> Option<ViewId> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: ViewId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Whether `id` is `ancestor` or lies beneath it.
    pub fn is_within(&self, id: ViewId, ancestor: ViewId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// All views in pre-order (declared child order).
    pub fn preorder(&self) -> Vec<ViewId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if !self.is_empty() {
            super::walk::walk_views(self, self.root(), &mut |node| order.push(node.id));
        }
        order
    }

    /// Unit views in pre-order.
    pub fn units(&self) -> impl Iterator<Item = (ViewId, &UnitView)> + '_ {
        self.preorder()
            .into_iter()
            .filter_map(move |id| self.node(id).as_unit().map(|unit| (id, unit)))
    }
}

/// Iterator returned by [`ViewTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a ViewTree,
    next: Option<ViewId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
