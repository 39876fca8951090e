//! Scale parsing and resolution.
//!
//! Every unit encoding on a scale channel that carries a field yields a
//! [`ScaleComponent`]. Components then travel up the view tree: at each
//! composite, a channel resolved as shared merges into one component owned by
//! the composite, while an independent channel stays with the child that
//! produced it. The result is a [`ScaleTable`] keyed by `(owner, channel)`.
//!
//! # Merge Rules
//!
//! - the first scale type seen wins
//! - field lists are unioned in first-seen order
//! - the first non-data domain wins

use indexmap::IndexMap;
use tracing::{debug, trace};
use vizsel_ast::foundation::default_scale_type;
use vizsel_ast::{Channel, ResolveMode, ScaleComponent, ViewId, ViewKind, ViewTree};

/// Parsed scales, keyed by owning view and channel.
#[derive(Debug, Clone, Default)]
pub struct ScaleTable {
    components: IndexMap<(ViewId, Channel), ScaleComponent>,
}

impl ScaleTable {
    pub fn get(&self, owner: ViewId, channel: Channel) -> Option<&ScaleComponent> {
        self.components.get(&(owner, channel))
    }

    /// The scale a view uses for `channel`: its own, or the nearest
    /// ancestor's.
    pub fn lookup(&self, tree: &ViewTree, view: ViewId, channel: Channel) -> Option<&ScaleComponent> {
        tree.ancestors(view).find_map(|id| self.get(id, channel))
    }

    pub fn lookup_mut(
        &mut self,
        tree: &ViewTree,
        view: ViewId,
        channel: Channel,
    ) -> Option<&mut ScaleComponent> {
        let owner = tree
            .ancestors(view)
            .find(|id| self.components.contains_key(&(*id, channel)))?;
        self.components.get_mut(&(owner, channel))
    }

    /// Scales owned by `view`, in canonical channel order.
    pub fn owned_by(&self, view: ViewId) -> Vec<&ScaleComponent> {
        let mut owned: Vec<_> = self
            .components
            .values()
            .filter(|component| component.owner == view)
            .collect();
        owned.sort_by_key(|component| component.channel);
        owned
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScaleComponent> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn finalize(&mut self, tree: &ViewTree, mut component: ScaleComponent) {
        component.name = if component.owner == tree.root() {
            component.channel.as_str().to_string()
        } else {
            format!("{}_{}", tree.name(component.owner), component.channel)
        };
        trace!(scale = %component.name, "scale resolved");
        self.components
            .insert((component.owner, component.channel), component);
    }
}

/// Parse the scales of every unit and resolve them through the tree.
pub fn parse_scales(tree: &ViewTree) -> ScaleTable {
    let mut table = ScaleTable::default();
    if tree.is_empty() {
        return table;
    }
    let root = tree.root();
    for (_, component) in collect(tree, root, &mut table) {
        table.finalize(tree, component);
    }
    debug!(scales = table.len(), "parsed scales");
    table
}

/// Components of `view` still open to merging by its parent.
fn collect(tree: &ViewTree, view: ViewId, table: &mut ScaleTable) -> IndexMap<Channel, ScaleComponent> {
    let node = tree.node(view);
    match &node.kind {
        ViewKind::Unit(unit) => unit
            .encoding
            .iter()
            .filter(|(channel, _)| channel.is_scale_channel())
            .filter_map(|(channel, def)| {
                let field = def.field.clone()?;
                let scale_type = def
                    .scale_type
                    .unwrap_or_else(|| default_scale_type(*channel, def.field_type, unit.mark, def.binned));
                Some((
                    *channel,
                    ScaleComponent {
                        name: String::new(),
                        channel: *channel,
                        scale_type,
                        domain: def.domain.clone(),
                        fields: vec![field],
                        owner: view,
                        binding: None,
                    },
                ))
            })
            .collect(),
        ViewKind::Composite(composite) => {
            let mut shared: IndexMap<Channel, ScaleComponent> = IndexMap::new();
            for &child in &node.children {
                for (channel, component) in collect(tree, child, table) {
                    match composite.scale_resolve(channel) {
                        ResolveMode::Independent => table.finalize(tree, component),
                        ResolveMode::Shared => match shared.get_mut(&channel) {
                            Some(merged) => merge(merged, component),
                            None => {
                                shared.insert(
                                    channel,
                                    ScaleComponent {
                                        owner: view,
                                        ..component
                                    },
                                );
                            }
                        },
                    }
                }
            }
            shared
        }
    }
}

fn merge(merged: &mut ScaleComponent, incoming: ScaleComponent) {
    for field in incoming.fields {
        if !merged.fields.contains(&field) {
            merged.fields.push(field);
        }
    }
    if merged.domain.is_data() && !incoming.domain.is_data() {
        merged.domain = incoming.domain;
    }
}
