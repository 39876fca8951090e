//! View spec normalization.
//!
//! Turns the loosely typed [`ViewSpec`] into the [`ViewTree`] arena every
//! later pass reads. Repeat templates are expanded into one instance per
//! (row, column) pair and `{repeat: ...}` field references are substituted,
//! so downstream passes only ever see concrete fields.
//!
//! # Naming
//!
//! - root: explicit `name`, else `"root"`
//! - children of the root: `<kind>_<index>` (`layer_0`, `concat_1`)
//! - deeper children: `<parent>_<kind>_<index>`
//! - repeat instances: `repeat_row_<r>_column_<c>` (prefixed like any child)
//! - facet templates: `child`
//!
//! An explicit `name` always wins, except on repeat templates where every
//! instance would otherwise share it.

use std::collections::HashSet;

use tracing::debug;
use vizsel_ast::spec::{ChannelSpec, DomainSpec, FieldDefSpec, FieldSpec, RepeatRef, RepeatSpec};
use vizsel_ast::{
    CompositeKind, CompositeView, FieldDef, FieldPath, Repeater, ScaleDomain, SelectionConfig,
    UnitView, ViewId, ViewKind, ViewSpec, ViewTree,
};

use crate::error::{CompileError, Result};

/// Build the view tree of a spec.
///
/// # Errors
///
/// - [`CompileError::MalformedView`] when a view is not exactly one of
///   mark / layer / concat / repeat / facet, or a template is missing
/// - [`CompileError::UnresolvedRepeat`] for a `{repeat: ...}` field outside a
///   matching repeat
/// - [`CompileError::DuplicateView`] when two views end up with one name
pub fn normalize(spec: &ViewSpec) -> Result<ViewTree> {
    let mut normalizer = Normalizer::default();
    let name = spec.name.clone().unwrap_or_else(|| "root".to_string());
    normalizer.view(spec, name, None, None)?;
    debug!(views = normalizer.tree.len(), "normalized view tree");
    Ok(normalizer.tree)
}

/// Selection defaults from the top-level `config` block.
///
/// Config blocks on nested views are ignored.
pub fn selection_config(spec: &ViewSpec) -> SelectionConfig {
    spec.config
        .as_ref()
        .map(|config| config.selection.clone())
        .unwrap_or_default()
}

/// Which composition form a view uses.
enum Shape<'a> {
    Unit,
    Layer(&'a [ViewSpec]),
    Concat(&'a [ViewSpec]),
    Repeat(&'a RepeatSpec, &'a ViewSpec),
    Facet(&'a ViewSpec),
}

#[derive(Default)]
struct Normalizer {
    tree: ViewTree,
    names: HashSet<String>,
}

impl Normalizer {
    fn view(
        &mut self,
        spec: &ViewSpec,
        name: String,
        parent: Option<ViewId>,
        repeater: Option<&Repeater>,
    ) -> Result<ViewId> {
        if !self.names.insert(name.clone()) {
            return Err(CompileError::DuplicateView(name));
        }

        match shape(spec, &name)? {
            Shape::Unit => {
                let unit = unit_view(spec, &name, repeater)?;
                Ok(self.tree.add(name, parent, ViewKind::Unit(unit)))
            }
            Shape::Layer(children) => {
                let id = self.composite(spec, &name, parent, CompositeKind::Layer);
                self.children(id, children, "layer", repeater)?;
                Ok(id)
            }
            Shape::Concat(children) => {
                let id = self.composite(spec, &name, parent, CompositeKind::Concat);
                self.children(id, children, "concat", repeater)?;
                Ok(id)
            }
            Shape::Repeat(repeat, template) => {
                let id = self.composite(spec, &name, parent, CompositeKind::Repeat);
                self.repeat_instances(id, repeat, template)?;
                Ok(id)
            }
            Shape::Facet(template) => {
                let id = self.composite(spec, &name, parent, CompositeKind::Facet);
                let child_name = self.child_name(id, template.name.as_deref(), "child".into());
                self.view(template, child_name, Some(id), repeater)?;
                Ok(id)
            }
        }
    }

    fn composite(
        &mut self,
        spec: &ViewSpec,
        name: &str,
        parent: Option<ViewId>,
        kind: CompositeKind,
    ) -> ViewId {
        let mut composite = CompositeView::new(kind);
        composite.scale_resolve = spec.resolve.scale.clone();
        self.tree.add(name, parent, ViewKind::Composite(composite))
    }

    fn children(
        &mut self,
        parent: ViewId,
        children: &[ViewSpec],
        kind: &str,
        repeater: Option<&Repeater>,
    ) -> Result<()> {
        for (index, child) in children.iter().enumerate() {
            let name = self.child_name(parent, child.name.as_deref(), format!("{}_{}", kind, index));
            self.view(child, name, Some(parent), repeater)?;
        }
        Ok(())
    }

    /// Rows outer, columns inner.
    fn repeat_instances(&mut self, parent: ViewId, repeat: &RepeatSpec, template: &ViewSpec) -> Result<()> {
        let rows = axis_values(repeat.row.as_deref());
        let columns = axis_values(repeat.column.as_deref());

        for row in &rows {
            for column in &columns {
                let mut local = String::from("repeat");
                if let Some((index, _)) = row {
                    local.push_str(&format!("_row_{}", index));
                }
                if let Some((index, _)) = column {
                    local.push_str(&format!("_column_{}", index));
                }
                let repeater = Repeater {
                    row: row.map(|(_, value)| value.to_string()),
                    column: column.map(|(_, value)| value.to_string()),
                };
                let name = self.child_name(parent, None, local);
                self.view(template, name, Some(parent), Some(&repeater))?;
            }
        }
        Ok(())
    }

    fn child_name(&self, parent: ViewId, explicit: Option<&str>, local: String) -> String {
        if let Some(name) = explicit {
            return name.to_string();
        }
        if parent == self.tree.root() {
            local
        } else {
            format!("{}_{}", self.tree.name(parent), local)
        }
    }
}

/// `[None]` for a missing axis so the other axis still iterates once.
fn axis_values(values: Option<&[String]>) -> Vec<Option<(usize, &str)>> {
    match values {
        Some(values) => values
            .iter()
            .enumerate()
            .map(|(index, value)| Some((index, value.as_str())))
            .collect(),
        None => vec![None],
    }
}

fn shape<'a>(spec: &'a ViewSpec, name: &str) -> Result<Shape<'a>> {
    let mut shapes = Vec::new();
    if spec.mark.is_some() {
        shapes.push(Shape::Unit);
    }
    if let Some(layer) = &spec.layer {
        shapes.push(Shape::Layer(layer));
    }
    for children in [&spec.hconcat, &spec.vconcat, &spec.concat].into_iter().flatten() {
        shapes.push(Shape::Concat(children));
    }
    if let Some(repeat) = &spec.repeat {
        if repeat.row.is_none() && repeat.column.is_none() {
            return Err(malformed(name, "repeat needs a row or column list"));
        }
        let template = spec
            .spec
            .as_deref()
            .ok_or_else(|| malformed(name, "repeat without a spec"))?;
        shapes.push(Shape::Repeat(repeat, template));
    }
    if spec.facet.is_some() {
        let template = spec
            .spec
            .as_deref()
            .ok_or_else(|| malformed(name, "facet without a spec"))?;
        shapes.push(Shape::Facet(template));
    }

    match shapes.len() {
        1 => Ok(shapes.remove(0)),
        found => Err(malformed(
            name,
            &format!(
                "expected exactly one of mark, layer, concat, repeat or facet, found {}",
                found
            ),
        )),
    }
}

fn malformed(view: &str, reason: &str) -> CompileError {
    CompileError::MalformedView {
        view: view.to_string(),
        reason: reason.to_string(),
    }
}

fn unit_view(spec: &ViewSpec, name: &str, repeater: Option<&Repeater>) -> Result<UnitView> {
    let mut unit = UnitView {
        mark: spec.mark.as_ref().map(|mark| mark.mark()).unwrap_or_default(),
        selections: spec.selection.clone(),
        repeater: repeater.cloned(),
        ..UnitView::default()
    };

    for (channel, channel_spec) in &spec.encoding {
        match channel_spec {
            ChannelSpec::Field(def) => {
                unit.encoding.insert(*channel, field_def(def, name, repeater)?);
            }
            ChannelSpec::List(_) => {
                debug!(view = name, channel = %channel, "skipping multi-field channel");
            }
        }
    }
    Ok(unit)
}

fn field_def(def: &FieldDefSpec, view: &str, repeater: Option<&Repeater>) -> Result<FieldDef> {
    let field = match &def.field {
        None => None,
        Some(FieldSpec::Name(name)) => Some(FieldPath::new(name.as_str())),
        Some(FieldSpec::Repeat { repeat }) => Some(repeat_field(*repeat, view, repeater)?),
    };
    let scale = def.scale.as_ref();
    let domain = match scale.and_then(|scale| scale.domain.as_ref()) {
        None | Some(DomainSpec::Keyword(_)) => ScaleDomain::Data,
        Some(DomainSpec::Literal(values)) => ScaleDomain::Literal(values.clone()),
        Some(DomainSpec::Selection(selection)) => ScaleDomain::Selection(selection.clone()),
    };
    Ok(FieldDef {
        field,
        field_type: def.field_type.unwrap_or_default(),
        binned: def.is_binned(),
        scale_type: scale.and_then(|scale| scale.scale_type),
        domain,
    })
}

fn repeat_field(reference: RepeatRef, view: &str, repeater: Option<&Repeater>) -> Result<FieldPath> {
    let value = repeater.and_then(|repeater| match reference {
        RepeatRef::Row => repeater.row.as_deref(),
        RepeatRef::Column => repeater.column.as_deref(),
    });
    value.map(FieldPath::from).ok_or_else(|| CompileError::UnresolvedRepeat {
        view: view.to_string(),
        reference: reference.as_str(),
    })
}
